//! Static variable tables.
//!
//! Each model declares its variables once, ordered by value reference. Because
//! references are contiguous from zero, lookup is a direct slice index.

use fmx_core::{FmuError, FmuResult, ValueReference};

/// Role of a variable towards the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Causality {
    /// The simulation clock.
    Independent,
    Parameter,
    Input,
    Output,
    /// Internal state or intermediate quantity.
    Local,
}

/// When a variable is allowed to change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variability {
    Constant,
    Fixed,
    Tunable,
    Discrete,
    Continuous,
}

/// Scalar storage type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarType {
    Float64,
}

/// One row of a variable table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Variable {
    pub vr: ValueReference,
    pub name: &'static str,
    pub causality: Causality,
    pub variability: Variability,
    pub ty: VarType,
    /// Start value applied by `set_start_values`, if any.
    pub start: Option<f64>,
    /// Position in the continuous-state vector, if the variable is a state.
    pub state_index: Option<usize>,
    pub description: &'static str,
}

impl Variable {
    pub const fn float64(
        vr: u32,
        name: &'static str,
        causality: Causality,
        variability: Variability,
    ) -> Self {
        Self {
            vr: ValueReference::new(vr),
            name,
            causality,
            variability,
            ty: VarType::Float64,
            start: None,
            state_index: None,
            description: "",
        }
    }

    pub const fn with_start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub const fn with_state_index(mut self, index: usize) -> Self {
        self.state_index = Some(index);
        self
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Compile-time table of a model's variables.
#[derive(Debug)]
pub struct VariableTable {
    variables: &'static [Variable],
}

impl VariableTable {
    pub const fn new(variables: &'static [Variable]) -> Self {
        Self { variables }
    }

    /// O(1) lookup of a value reference.
    pub fn get(&self, vr: ValueReference) -> Option<&Variable> {
        self.variables.get(vr.index()).filter(|var| var.vr == vr)
    }

    /// Host-tool lookup by name. Never used for dispatch.
    pub fn by_name(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|var| var.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Check the table is contiguous and uniquely named, and that state slots
    /// are unique and below `nx`. Models may declare more slots than they map.
    pub fn validate(&self, nx: usize) -> FmuResult<()> {
        for (i, var) in self.variables.iter().enumerate() {
            if var.vr.index() != i {
                return Err(FmuError::InvalidArg {
                    what: "value references must be contiguous from 0",
                });
            }
            if self.variables[..i].iter().any(|other| other.name == var.name) {
                return Err(FmuError::InvalidArg {
                    what: "variable names must be unique",
                });
            }
        }

        let mut seen = vec![false; nx];
        for slot in self.variables.iter().filter_map(|var| var.state_index) {
            match seen.get_mut(slot) {
                Some(flag) if !*flag => *flag = true,
                _ => {
                    return Err(FmuError::InvalidArg {
                        what: "continuous-state slots must be unique and below nx",
                    });
                }
            }
        }
        Ok(())
    }
}

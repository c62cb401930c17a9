//! Dummy coupling model: one input, one output and an increment parameter.
//!
//! The model has no integrated variables. NX and NZ are still declared (2
//! and 1) so hosts exercise the full continuous-state protocol against it;
//! the corresponding calls are no-ops.

use fmx_core::{Capabilities, FmuError, FmuResult, ModelConfig, ValueReference};

use crate::cursor::{Float64Sink, Float64Source};
use crate::instance::HostState;
use crate::model::Model;
use crate::variables::{Causality, Variability, Variable, VariableTable};

/// Variables of the Dummy model, in value-reference order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DummyVar {
    Time,
    ReadData,
    WriteData,
    Increment,
}

impl DummyVar {
    pub const fn vr(self) -> ValueReference {
        ValueReference::new(self as u32)
    }

    pub fn from_vr(vr: ValueReference) -> Option<Self> {
        match vr.get() {
            0 => Some(DummyVar::Time),
            1 => Some(DummyVar::ReadData),
            2 => Some(DummyVar::WriteData),
            3 => Some(DummyVar::Increment),
            _ => None,
        }
    }
}

static VARIABLES: VariableTable = VariableTable::new(&[
    Variable::float64(0, "time", Causality::Independent, Variability::Continuous)
        .with_description("Simulation time"),
    Variable::float64(1, "read_data", Causality::Input, Variability::Continuous)
        .with_start(0.0)
        .with_description("Value received from the coupling partner"),
    Variable::float64(2, "write_data", Causality::Output, Variability::Continuous)
        .with_description("Value sent to the coupling partner"),
    Variable::float64(3, "increment", Causality::Parameter, Variability::Tunable)
        .with_start(1.0),
]);

/// Dummy model storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Dummy {
    pub read_data: f64,
    pub write_data: f64,
    pub increment: f64,
    /// Route `write_data` and `increment` writes into `read_data`.
    reference_aliasing: bool,
}

impl Default for Dummy {
    fn default() -> Self {
        let mut model = Self {
            read_data: 0.0,
            write_data: 0.0,
            increment: 0.0,
            reference_aliasing: false,
        };
        model.set_start_values();
        model
    }
}

impl Dummy {
    /// Dummy with the aliasing setter some existing hosts are calibrated against:
    /// writes to `write_data` and `increment` land in `read_data`.
    pub fn with_reference_aliasing() -> Self {
        Self {
            reference_aliasing: true,
            ..Self::default()
        }
    }

    pub fn reference_aliasing(&self) -> bool {
        self.reference_aliasing
    }
}

impl Model for Dummy {
    const CONFIG: ModelConfig = ModelConfig {
        identifier: "Dummy",
        instantiation_token: "{1AE5E10D-9521-4DE3-80B9-D0EAAA7D5AF1}",
        fixed_solver_step: 1e-3,
        default_stop_time: 3.0,
        nx: 2,
        nz: 1,
        capabilities: Capabilities::all(),
    };

    fn variables() -> &'static VariableTable {
        &VARIABLES
    }

    fn set_start_values(&mut self) {
        self.read_data = 0.0;
        self.write_data = 0.0;
        self.increment = 1.0;
    }

    fn get_float64(
        &self,
        host: &HostState,
        vr: ValueReference,
        out: &mut Float64Sink<'_>,
    ) -> FmuResult<()> {
        match DummyVar::from_vr(vr) {
            Some(DummyVar::Time) => out.push(host.time()),
            Some(DummyVar::ReadData) => out.push(self.read_data),
            Some(DummyVar::WriteData) => out.push(self.write_data),
            Some(DummyVar::Increment) => out.push(self.increment),
            None => Err(FmuError::GetNotAllowed { vr }),
        }
    }

    fn set_float64(&mut self, vr: ValueReference, input: &mut Float64Source<'_>) -> FmuResult<()> {
        match DummyVar::from_vr(vr) {
            Some(DummyVar::Time) => Err(FmuError::ReadOnly { vr, name: "time" }),
            Some(DummyVar::ReadData) => {
                self.read_data = input.next_value()?;
                Ok(())
            }
            Some(DummyVar::WriteData) => {
                let value = input.next_value()?;
                if self.reference_aliasing {
                    self.read_data = value;
                } else {
                    self.write_data = value;
                }
                Ok(())
            }
            Some(DummyVar::Increment) => {
                let value = input.next_value()?;
                if self.reference_aliasing {
                    self.read_data = value;
                } else {
                    self.increment = value;
                }
                Ok(())
            }
            None => Err(FmuError::UnexpectedReference { vr }),
        }
    }
}

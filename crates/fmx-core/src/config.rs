//! Definition-time model constants.
//!
//! A model fixes its size (NX, NZ), solver step, stop time and enabled
//! capabilities once, when it is defined. The instance consumes these values
//! but never owns or mutates them.

use core::fmt;

/// How the host drives an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum InterfaceType {
    /// Host integrates the continuous states itself.
    ModelExchange,
    /// Model advances itself across communication steps.
    CoSimulation,
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceType::ModelExchange => f.write_str("model-exchange"),
            InterfaceType::CoSimulation => f.write_str("co-simulation"),
        }
    }
}

/// Optional entry points a model chooses to provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Capabilities {
    pub co_simulation: bool,
    pub model_exchange: bool,
    pub set_float64: bool,
    pub get_output_derivative: bool,
    pub event_update: bool,
    pub get_set_state: bool,
}

impl Capabilities {
    pub const fn all() -> Self {
        Self {
            co_simulation: true,
            model_exchange: true,
            set_float64: true,
            get_output_derivative: true,
            event_update: true,
            get_set_state: true,
        }
    }

    pub fn supports(&self, interface: InterfaceType) -> bool {
        match interface {
            InterfaceType::ModelExchange => self.model_exchange,
            InterfaceType::CoSimulation => self.co_simulation,
        }
    }
}

/// Fixed constants of one model definition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModelConfig {
    /// Model identifier (also the unit name on disk)
    pub identifier: &'static str,
    /// Token the host must present when instantiating
    pub instantiation_token: &'static str,
    /// Internal step used by co-simulation (seconds)
    pub fixed_solver_step: f64,
    /// Stop time used when the host gives none (seconds)
    pub default_stop_time: f64,
    /// Number of continuous states
    pub nx: usize,
    /// Number of event indicators
    pub nz: usize,
    pub capabilities: Capabilities,
}

impl ModelConfig {
    /// Check the constants make sense before any instance is created.
    pub fn validate(&self) -> crate::FmuResult<()> {
        if !(self.fixed_solver_step.is_finite() && self.fixed_solver_step > 0.0) {
            return Err(crate::FmuError::InvalidArg {
                what: "fixed_solver_step must be positive",
            });
        }
        if !(self.default_stop_time.is_finite() && self.default_stop_time >= 0.0) {
            return Err(crate::FmuError::InvalidArg {
                what: "default_stop_time must be non-negative",
            });
        }
        if self.identifier.is_empty() {
            return Err(crate::FmuError::InvalidArg {
                what: "identifier must not be empty",
            });
        }
        Ok(())
    }
}

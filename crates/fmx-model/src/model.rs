//! Model trait for concrete model definitions.

use fmx_core::{FmuError, FmuResult, ModelConfig, ValueReference};

use crate::cursor::{Float64Sink, Float64Source};
use crate::instance::HostState;
use crate::variables::VariableTable;

/// Outcome of a model's discrete state update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventUpdate {
    /// Continuous-state values were changed by the update.
    pub values_changed: bool,
    /// Ask the host to end the run.
    pub terminate: bool,
    /// Next time event scheduled by the model, if any.
    pub next_event_time: Option<f64>,
}

/// A concrete model definition.
///
/// A Model must provide:
/// - Definition-time constants (`CONFIG`) and a variable table
/// - Start values
/// - Float64 dispatch by value reference
///
/// Continuous-state, derivative and indicator methods default to no-ops for
/// models without integrated variables. Implementations only see buffers
/// whose lengths already match `CONFIG.nx` / `CONFIG.nz`.
pub trait Model: Clone + std::fmt::Debug + Send {
    const CONFIG: ModelConfig;

    fn variables() -> &'static VariableTable;

    /// Reset all model-owned storage to its defaults.
    fn set_start_values(&mut self);

    /// Recompute dependent variables from inputs and states.
    fn calculate_values(&mut self, _host: &HostState) -> FmuResult<()> {
        Ok(())
    }

    /// Write the value of `vr` at the sink cursor.
    fn get_float64(
        &self,
        host: &HostState,
        vr: ValueReference,
        out: &mut Float64Sink<'_>,
    ) -> FmuResult<()>;

    /// Read the value for `vr` from the source cursor.
    fn set_float64(&mut self, vr: ValueReference, input: &mut Float64Source<'_>) -> FmuResult<()>;

    /// First-order time derivative of an output.
    fn get_output_derivative(&self, _host: &HostState, vr: ValueReference) -> FmuResult<f64> {
        Err(FmuError::NoOutputDerivative { vr })
    }

    /// Apply discrete changes at an event.
    fn event_update(&mut self, _host: &HostState) -> EventUpdate {
        EventUpdate::default()
    }

    fn get_continuous_states(&self, _x: &mut [f64]) {}

    fn set_continuous_states(&mut self, _x: &[f64]) {}

    fn get_nominals_of_continuous_states(&self, nominals: &mut [f64]) {
        nominals.fill(1.0);
    }

    fn get_derivatives(&self, _host: &HostState, _dx: &mut [f64]) {}

    fn get_event_indicators(&self, _host: &HostState, _z: &mut [f64]) {}
}

//! Host-side drivers for fmx model instances.
//!
//! Provides:
//! - Fixed-step integrators (forward Euler, RK4) over the flat state vector
//! - Model-exchange run loop with state and time event handling
//! - Co-simulation run loop
//! - Step-hold input signals and a result recorder with CSV export

pub mod error;
pub mod input;
pub mod integrator;
pub mod recorder;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use input::InputSignals;
pub use integrator::{ContinuousSystem, ForwardEuler, Integrator, RK4};
pub use recorder::Recorder;
pub use sim::{IntegratorType, SimOptions, SimOutcome, run_co_simulation, run_model_exchange};

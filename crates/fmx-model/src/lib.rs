//! Model side of the fmx simulation-interchange interface.
//!
//! Provides:
//! - Variable tables mapping value references to typed variables
//! - The `Model` trait a concrete model implements
//! - `ModelInstance`: per-run state, host bookkeeping and lifecycle
//! - Cursor-based Float64 accessors
//! - Continuous-state vector interface and event update engine
//! - Model-side fixed-step co-simulation
//! - Dummy and bouncing-ball reference models

pub mod cursor;
pub mod instance;
pub mod logger;
pub mod model;
pub mod models;
pub mod variables;

// Operations on `ModelInstance`, split by concern
mod accessors;
mod continuous;
mod cosim;
mod events;

// Re-exports for public API
pub use cosim::StepResult;
pub use cursor::{Float64Sink, Float64Source};
pub use fmx_core::{FmuError, FmuResult, InterfaceType, ModelConfig, Status, ValueReference};
pub use instance::{EventFlags, HostState, Mode, ModelInstance, ModelSnapshot};
pub use logger::{LogRecord, Logger, MemoryLogger, TracingLogger};
pub use model::{EventUpdate, Model};
pub use models::{BouncingBall, Dummy};
pub use variables::{Causality, VarType, Variability, Variable, VariableTable};

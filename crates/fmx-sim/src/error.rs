//! Error types for simulation runs.

use fmx_core::FmuError;
use thiserror::Error;

/// Errors encountered while driving an instance.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Invalid input signals: {what}")]
    InvalidInput { what: String },

    #[error("Model call failed: {0}")]
    Model(#[from] FmuError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;

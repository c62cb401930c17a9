use fmx_core::FmuError;
use fmx_sim::SimError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {what}")]
    InvalidSettings { what: String },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Model error: {0}")]
    Model(#[from] FmuError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

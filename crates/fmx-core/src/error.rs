use thiserror::Error;

use crate::ValueReference;

pub type FmuResult<T> = Result<T, FmuError>;

/// Errors a model instance reports back to its host.
///
/// Every variant carries enough context (reference, order, sizes) to be
/// diagnosed from the log line alone.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FmuError {
    #[error("Get Float64 is not allowed for value reference {vr}.")]
    GetNotAllowed { vr: ValueReference },

    #[error("Unexpected value reference: {vr}.")]
    UnexpectedReference { vr: ValueReference },

    #[error("Variable {name} (value reference {vr}) is read-only.")]
    ReadOnly { vr: ValueReference, name: &'static str },

    #[error("The output derivative order {order} for value reference {vr} is not available.")]
    UnsupportedDerivativeOrder { vr: ValueReference, order: i32 },

    #[error("The output derivative for value reference {vr} is not available.")]
    NoOutputDerivative { vr: ValueReference },

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Value buffer exhausted (index={index}, len={len})")]
    CursorOutOfBounds { index: usize, len: usize },

    #[error("{call} is not allowed in {mode}")]
    IllegalCall {
        call: &'static str,
        mode: &'static str,
    },

    #[error("Capability not enabled: {what}")]
    NotSupported { what: &'static str },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

//! fmx-core: stable foundation for the fmx model interface.
//!
//! Contains:
//! - ids (value references handed out to the host)
//! - numeric (clock comparison, finiteness and sign-change helpers)
//! - status (host-visible call status)
//! - config (definition-time model constants and capabilities)
//! - error (shared error types)

pub mod config;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod status;

// Re-exports: nice ergonomics for downstream crates
pub use config::{Capabilities, InterfaceType, ModelConfig};
pub use error::{FmuError, FmuResult};
pub use ids::*;
pub use numeric::*;
pub use status::Status;

//! Logging collaborator for model instances.
//!
//! Instances report every error through a `Logger` exactly once, at the point
//! it occurs. Formatting is done by the error type; routing is up to the
//! logger.

use std::sync::{Arc, Mutex, MutexGuard};

use fmx_core::Status;

/// Receives diagnostics from an instance.
pub trait Logger: Send {
    fn log(&self, instance: &str, status: Status, category: &'static str, message: &str);
}

/// Forwards messages to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, instance: &str, status: Status, category: &'static str, message: &str) {
        match status {
            Status::Error => tracing::error!(instance, category, "{message}"),
            Status::Ok => tracing::debug!(instance, category, "{message}"),
        }
    }
}

/// One captured log call.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub instance: String,
    pub status: Status,
    pub category: &'static str,
    pub message: String,
}

/// Collects log calls in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        // a panicked writer cannot leave a Vec half-pushed
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn error_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|r| r.status == Status::Error)
            .count()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, instance: &str, status: Status, category: &'static str, message: &str) {
        self.lock().push(LogRecord {
            instance: instance.to_string(),
            status,
            category,
            message: message.to_string(),
        });
    }
}

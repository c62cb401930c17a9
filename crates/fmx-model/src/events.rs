//! Event update engine.

use fmx_core::{FmuError, FmuResult};

use crate::instance::{EventFlags, Mode, ModelInstance};
use crate::model::Model;

impl<M: Model> ModelInstance<M> {
    /// Resolve discrete changes at the current event.
    ///
    /// Flags not explicitly requested by the model come back cleared:
    /// nominals never change, termination and the next time event are only
    /// set when the model asks for them.
    pub fn event_update(&mut self) -> FmuResult<EventFlags> {
        if !M::CONFIG.capabilities.event_update {
            return self.fail(FmuError::NotSupported {
                what: "event update",
            });
        }
        self.require("event_update", &[Mode::EventMode])?;
        self.refresh()?;
        self.apply_event_update();
        Ok(self.host.events)
    }

    /// Run the model's update and publish the flags, bypassing mode checks.
    pub(crate) fn apply_event_update(&mut self) {
        let update = self.model.event_update(&self.host);
        self.host.events.apply(update);
        if update.values_changed {
            self.dirty = true;
        }
        if update.terminate {
            tracing::warn!(instance = %self.name, time = self.host.time, "model requested termination");
        }
        tracing::debug!(
            instance = %self.name,
            time = self.host.time,
            values_changed = update.values_changed,
            next_event = ?update.next_event_time,
            "event update"
        );
    }
}

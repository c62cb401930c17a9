//! Model instances: model storage, host bookkeeping and lifecycle.
//!
//! Exactly one `ModelInstance` exists per simulation run. The host serializes
//! every call against it; nothing here locks.

use std::fmt;

use fmx_core::{FmuError, FmuResult, InterfaceType, ModelConfig, Status, ensure_finite};

use crate::logger::Logger;
use crate::model::{EventUpdate, Model};

/// Lifecycle state of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Instantiated,
    InitializationMode,
    /// Discrete changes are being resolved.
    EventMode,
    /// The host is integrating the continuous states.
    ContinuousTimeMode,
    /// Co-simulation between communication points.
    StepMode,
    Terminated,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Instantiated => "Instantiated",
            Mode::InitializationMode => "Initialization Mode",
            Mode::EventMode => "Event Mode",
            Mode::ContinuousTimeMode => "Continuous-Time Mode",
            Mode::StepMode => "Step Mode",
            Mode::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-visible flags written by the event update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventFlags {
    pub values_of_continuous_states_changed: bool,
    pub nominals_of_continuous_states_changed: bool,
    pub terminate_simulation: bool,
    pub next_event_time_defined: bool,
    /// Only meaningful while `next_event_time_defined` is set.
    pub next_event_time: f64,
}

impl EventFlags {
    pub(crate) fn apply(&mut self, update: EventUpdate) {
        self.values_of_continuous_states_changed = update.values_changed;
        self.nominals_of_continuous_states_changed = false;
        self.terminate_simulation = update.terminate;
        match update.next_event_time {
            Some(t) => {
                self.next_event_time_defined = true;
                self.next_event_time = t;
            }
            None => {
                self.next_event_time_defined = false;
                self.next_event_time = 0.0;
            }
        }
    }

    /// Whether a scheduled time event falls at or before `time`.
    pub fn time_event_due(&self, time: f64) -> bool {
        self.next_event_time_defined && time >= self.next_event_time
    }
}

/// Bookkeeping owned by the host side of an instance.
#[derive(Clone, Debug, PartialEq)]
pub struct HostState {
    pub(crate) time: f64,
    pub(crate) start_time: f64,
    pub(crate) stop_time: Option<f64>,
    pub(crate) events: EventFlags,
}

impl HostState {
    pub fn new(start_time: f64) -> Self {
        Self {
            time: start_time,
            start_time,
            stop_time: None,
            events: EventFlags::default(),
        }
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn stop_time(&self) -> Option<f64> {
        self.stop_time
    }

    pub fn events(&self) -> &EventFlags {
        &self.events
    }
}

/// Saved copy of an instance, for rollback.
#[derive(Clone, Debug)]
pub struct ModelSnapshot<M> {
    model: M,
    host: HostState,
    mode: Mode,
    dirty: bool,
}

impl<M> ModelSnapshot<M> {
    /// Simulation time at which the snapshot was taken.
    pub fn time(&self) -> f64 {
        self.host.time
    }
}

/// One simulation instance of model `M`.
pub struct ModelInstance<M: Model> {
    pub(crate) name: String,
    pub(crate) interface: InterfaceType,
    pub(crate) mode: Mode,
    pub(crate) model: M,
    pub(crate) host: HostState,
    /// Inputs or states changed since the last `calculate_values`.
    pub(crate) dirty: bool,
    logger: Box<dyn Logger>,
}

impl<M: Model> ModelInstance<M> {
    /// Instantiate around explicit model storage and logger.
    pub fn with_model(
        name: impl Into<String>,
        interface: InterfaceType,
        mut model: M,
        logger: impl Logger + 'static,
    ) -> FmuResult<Self> {
        let name = name.into();
        let config = M::CONFIG;

        let checked = config
            .validate()
            .and_then(|()| M::variables().validate(config.nx))
            .and_then(|()| {
                if config.capabilities.supports(interface) {
                    Ok(())
                } else {
                    Err(FmuError::NotSupported {
                        what: "requested interface type",
                    })
                }
            });
        if let Err(err) = checked {
            logger.log(&name, Status::Error, "logStatusError", &err.to_string());
            return Err(err);
        }

        model.set_start_values();
        tracing::debug!(instance = %name, model = config.identifier, %interface, "instantiated");

        Ok(Self {
            name,
            interface,
            mode: Mode::Instantiated,
            model,
            host: HostState::new(0.0),
            dirty: false,
            logger: Box::new(logger),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interface(&self) -> InterfaceType {
        self.interface
    }

    pub fn config(&self) -> ModelConfig {
        M::CONFIG
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn host(&self) -> &HostState {
        &self.host
    }

    pub fn time(&self) -> f64 {
        self.host.time
    }

    pub fn event_flags(&self) -> &EventFlags {
        &self.host.events
    }

    /// Report an error through the logger and hand it back.
    pub(crate) fn fail<T>(&self, err: FmuError) -> FmuResult<T> {
        self.logger
            .log(&self.name, Status::Error, "logStatusError", &err.to_string());
        Err(err)
    }

    pub(crate) fn require(&self, call: &'static str, allowed: &[Mode]) -> FmuResult<()> {
        if allowed.contains(&self.mode) {
            Ok(())
        } else {
            self.fail(FmuError::IllegalCall {
                call,
                mode: self.mode.name(),
            })
        }
    }

    fn transition(&mut self, to: Mode) {
        tracing::debug!(instance = %self.name, from = %self.mode, to = %to, "mode change");
        self.mode = to;
    }

    /// Reset model storage to its defaults.
    pub fn set_start_values(&mut self) {
        self.model.set_start_values();
        self.dirty = false;
    }

    /// Recompute dependent variables.
    pub fn calculate_values(&mut self) -> FmuResult<()> {
        if let Err(err) = self.model.calculate_values(&self.host) {
            return self.fail(err);
        }
        self.dirty = false;
        Ok(())
    }

    /// Recompute only if something changed since the last calculation.
    pub(crate) fn refresh(&mut self) -> FmuResult<()> {
        if self.dirty {
            self.calculate_values()?;
        }
        Ok(())
    }

    pub fn enter_initialization_mode(
        &mut self,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> FmuResult<()> {
        self.require("enter_initialization_mode", &[Mode::Instantiated])?;
        if let Err(err) = ensure_finite(start_time, "start_time") {
            return self.fail(err);
        }
        if stop_time.is_some_and(|stop| !(stop >= start_time)) {
            return self.fail(FmuError::InvalidArg {
                what: "stop_time must not precede start_time",
            });
        }

        self.host.time = start_time;
        self.host.start_time = start_time;
        self.host.stop_time = stop_time;
        self.transition(Mode::InitializationMode);
        Ok(())
    }

    pub fn exit_initialization_mode(&mut self) -> FmuResult<()> {
        self.require("exit_initialization_mode", &[Mode::InitializationMode])?;
        self.calculate_values()?;
        let next = match self.interface {
            InterfaceType::ModelExchange => Mode::EventMode,
            InterfaceType::CoSimulation => {
                // no host-driven event mode here, so resolve the initial event now
                if M::CONFIG.capabilities.event_update {
                    self.apply_event_update();
                    self.refresh()?;
                }
                Mode::StepMode
            }
        };
        self.transition(next);
        Ok(())
    }

    pub fn enter_event_mode(&mut self) -> FmuResult<()> {
        self.require(
            "enter_event_mode",
            &[Mode::ContinuousTimeMode, Mode::EventMode],
        )?;
        self.transition(Mode::EventMode);
        Ok(())
    }

    pub fn enter_continuous_time_mode(&mut self) -> FmuResult<()> {
        self.require("enter_continuous_time_mode", &[Mode::EventMode])?;
        self.transition(Mode::ContinuousTimeMode);
        Ok(())
    }

    /// Advance the clock during continuous-time integration.
    pub fn set_time(&mut self, time: f64) -> FmuResult<()> {
        self.require("set_time", &[Mode::ContinuousTimeMode])?;
        if let Err(err) = ensure_finite(time, "time") {
            return self.fail(err);
        }
        self.host.time = time;
        self.dirty = true;
        Ok(())
    }

    pub fn terminate(&mut self) -> FmuResult<()> {
        self.require(
            "terminate",
            &[
                Mode::EventMode,
                Mode::ContinuousTimeMode,
                Mode::StepMode,
                Mode::Terminated,
            ],
        )?;
        self.transition(Mode::Terminated);
        Ok(())
    }

    /// Return to the freshly instantiated state.
    pub fn reset(&mut self) {
        self.model.set_start_values();
        self.host = HostState::new(0.0);
        self.dirty = false;
        self.transition(Mode::Instantiated);
    }

    /// Copy the complete instance state.
    pub fn snapshot(&self) -> FmuResult<ModelSnapshot<M>> {
        if !M::CONFIG.capabilities.get_set_state {
            return self.fail(FmuError::NotSupported { what: "get state" });
        }
        Ok(ModelSnapshot {
            model: self.model.clone(),
            host: self.host.clone(),
            mode: self.mode,
            dirty: self.dirty,
        })
    }

    /// Roll back to a previously taken snapshot.
    pub fn restore(&mut self, snapshot: &ModelSnapshot<M>) -> FmuResult<()> {
        if !M::CONFIG.capabilities.get_set_state {
            return self.fail(FmuError::NotSupported { what: "set state" });
        }
        self.model = snapshot.model.clone();
        self.host = snapshot.host.clone();
        self.mode = snapshot.mode;
        self.dirty = snapshot.dirty;
        tracing::debug!(instance = %self.name, time = self.host.time, "state restored");
        Ok(())
    }
}

impl<M: Model> fmt::Debug for ModelInstance<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelInstance")
            .field("name", &self.name)
            .field("interface", &self.interface)
            .field("mode", &self.mode)
            .field("model", &self.model)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

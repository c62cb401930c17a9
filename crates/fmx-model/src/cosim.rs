//! Model-side co-simulation step.
//!
//! A communication step is split into internal steps of the model's
//! `fixed_solver_step`. Continuous states advance with forward Euler; after
//! each internal step the indicators are checked for sign changes and due
//! time events, which trigger an event update.

use fmx_core::{FmuError, FmuResult, any_sign_changed, same_instant};

use crate::instance::{Mode, ModelInstance};
use crate::model::Model;

/// Outcome of one communication step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepResult {
    /// At least one event was handled inside the step.
    pub event_encountered: bool,
    /// The model asked to end the run; the step stopped early.
    pub terminate: bool,
    /// Time the instance actually reached.
    pub last_successful_time: f64,
}

impl<M: Model> ModelInstance<M> {
    pub fn do_step(
        &mut self,
        current_communication_point: f64,
        communication_step_size: f64,
    ) -> FmuResult<StepResult> {
        self.require("do_step", &[Mode::StepMode])?;
        if !(communication_step_size.is_finite() && communication_step_size > 0.0) {
            return self.fail(FmuError::InvalidArg {
                what: "communication step size must be positive",
            });
        }

        let h = M::CONFIG.fixed_solver_step;
        if !same_instant(current_communication_point, self.host.time, h) {
            return self.fail(FmuError::InvalidArg {
                what: "communication point does not match model time",
            });
        }

        let end = current_communication_point + communication_step_size;
        let eps = h * 1e-9;
        let nx = M::CONFIG.nx;
        let nz = M::CONFIG.nz;
        let mut x = vec![0.0; nx];
        let mut dx = vec![0.0; nx];
        let mut z_prev = vec![0.0; nz];
        let mut z = vec![0.0; nz];

        self.refresh()?;
        self.model.get_event_indicators(&self.host, &mut z_prev);

        let mut result = StepResult {
            event_encountered: false,
            terminate: false,
            last_successful_time: self.host.time,
        };

        while self.host.time < end - eps {
            let mut next = (self.host.time + h).min(end);
            let events = self.host.events;
            if events.next_event_time_defined && events.next_event_time > self.host.time {
                next = next.min(events.next_event_time);
            }
            let dt = next - self.host.time;

            if nx > 0 {
                self.model.get_continuous_states(&mut x);
                self.model.get_derivatives(&self.host, &mut dx);
                for (xi, dxi) in x.iter_mut().zip(&dx) {
                    *xi += dt * dxi;
                }
                self.model.set_continuous_states(&x);
            }
            self.host.time = next;
            self.calculate_values()?;

            self.model.get_event_indicators(&self.host, &mut z);
            let state_event = any_sign_changed(&z_prev, &z);
            let time_event = self.host.events.time_event_due(self.host.time);
            if state_event || time_event {
                result.event_encountered = true;
                self.apply_event_update();
                self.refresh()?;
                if self.host.events.terminate_simulation {
                    result.terminate = true;
                    result.last_successful_time = self.host.time;
                    return Ok(result);
                }
                self.model.get_event_indicators(&self.host, &mut z);
            }

            std::mem::swap(&mut z_prev, &mut z);
            result.last_successful_time = self.host.time;
        }

        // absorb rounding left over from the last internal step
        self.host.time = end;
        result.last_successful_time = end;
        Ok(result)
    }
}

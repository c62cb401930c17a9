//! Simulation run loops.

use fmx_core::any_sign_changed;
use fmx_model::{EventFlags, Model, ModelInstance};

use crate::error::{SimError, SimResult};
use crate::input::InputSignals;
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::recorder::Recorder;

/// Integrator selection for model-exchange runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Start time (seconds)
    pub start_time: f64,
    /// Stop time (seconds); the model's default stop time when unset
    pub stop_time: Option<f64>,
    /// Output / communication step (seconds)
    pub step_size: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integrator type (model exchange only)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            stop_time: None,
            step_size: 1e-3,
            max_steps: 1_000_000,
            record_every: 1,
            integrator: IntegratorType::default(),
        }
    }
}

impl SimOptions {
    fn validate(&self, stop: f64) -> SimResult<()> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(SimError::InvalidArg {
                what: "step_size must be positive",
            });
        }
        if !self.start_time.is_finite() || !(stop >= self.start_time) {
            return Err(SimError::InvalidArg {
                what: "stop_time must not precede start_time",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Summary of a finished run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimOutcome {
    pub steps: usize,
    pub events: usize,
    pub final_time: f64,
    /// The model ended the run before the stop time.
    pub terminated: bool,
}

fn integrate<I: Integrator, M: Model>(
    integrator: &I,
    inst: &mut ModelInstance<M>,
    t: f64,
    x: &[f64],
    dt: f64,
) -> SimResult<Vec<f64>> {
    integrator.step(inst, t, x, dt)
}

/// Drive a model-exchange instance from start to stop time.
///
/// The instance must be freshly instantiated; it is terminated on return.
pub fn run_model_exchange<M: Model>(
    inst: &mut ModelInstance<M>,
    opts: &SimOptions,
    inputs: Option<&InputSignals>,
    recorder: &mut Recorder,
) -> SimResult<SimOutcome> {
    let stop = opts.stop_time.unwrap_or(M::CONFIG.default_stop_time);
    opts.validate(stop)?;
    let nx = M::CONFIG.nx;
    let nz = M::CONFIG.nz;
    let eps = opts.step_size * 1e-9;

    inst.enter_initialization_mode(opts.start_time, Some(stop))?;
    if let Some(inputs) = inputs {
        inputs.apply(inst, opts.start_time)?;
    }
    inst.exit_initialization_mode()?;

    let mut outcome = SimOutcome {
        steps: 0,
        events: 0,
        final_time: opts.start_time,
        terminated: false,
    };

    let mut flags: EventFlags = inst.event_update()?;
    if flags.terminate_simulation {
        outcome.terminated = true;
        recorder.sample(inst)?;
        inst.terminate()?;
        return Ok(outcome);
    }
    inst.enter_continuous_time_mode()?;
    recorder.sample(inst)?;

    let mut x = vec![0.0; nx];
    let mut z_prev = vec![0.0; nz];
    let mut z = vec![0.0; nz];
    inst.get_continuous_states(&mut x)?;
    inst.get_event_indicators(&mut z_prev)?;

    let mut t = opts.start_time;
    let mut last_recorded = true;
    while t < stop - eps && outcome.steps < opts.max_steps {
        let mut t_next = (t + opts.step_size).min(stop);
        if flags.next_event_time_defined && flags.next_event_time > t {
            t_next = t_next.min(flags.next_event_time);
        }
        let dt = t_next - t;

        let x_next = match opts.integrator {
            IntegratorType::RK4 => integrate(&RK4, inst, t, &x, dt)?,
            IntegratorType::ForwardEuler => integrate(&ForwardEuler, inst, t, &x, dt)?,
        };
        t = t_next;
        inst.set_time(t)?;
        inst.set_continuous_states(&x_next)?;
        x = x_next;
        if let Some(inputs) = inputs {
            inputs.apply(inst, t)?;
        }
        outcome.steps += 1;

        inst.get_event_indicators(&mut z)?;
        let state_event = any_sign_changed(&z_prev, &z);
        let time_event = flags.time_event_due(t);
        if state_event || time_event {
            inst.enter_event_mode()?;
            flags = inst.event_update()?;
            outcome.events += 1;
            tracing::debug!(time = t, state_event, time_event, "handled event");

            if flags.terminate_simulation {
                outcome.terminated = true;
                break;
            }
            inst.enter_continuous_time_mode()?;
            if flags.values_of_continuous_states_changed {
                inst.get_continuous_states(&mut x)?;
            }
            inst.get_event_indicators(&mut z)?;
        }
        std::mem::swap(&mut z_prev, &mut z);

        last_recorded = outcome.steps % opts.record_every == 0;
        if last_recorded {
            recorder.sample(inst)?;
        }
    }

    // Always record final state
    if !last_recorded || outcome.terminated {
        recorder.sample(inst)?;
    }
    if outcome.steps >= opts.max_steps && t < stop - eps {
        tracing::warn!(steps = outcome.steps, time = t, "max_steps reached before stop time");
    }

    outcome.final_time = t;
    inst.terminate()?;
    Ok(outcome)
}

/// Drive a co-simulation instance from start to stop time.
///
/// Inputs are applied before every communication step. The instance must be
/// freshly instantiated; it is terminated on return.
pub fn run_co_simulation<M: Model>(
    inst: &mut ModelInstance<M>,
    opts: &SimOptions,
    inputs: Option<&InputSignals>,
    recorder: &mut Recorder,
) -> SimResult<SimOutcome> {
    let stop = opts.stop_time.unwrap_or(M::CONFIG.default_stop_time);
    opts.validate(stop)?;
    let eps = opts.step_size * 1e-9;

    inst.enter_initialization_mode(opts.start_time, Some(stop))?;
    if let Some(inputs) = inputs {
        inputs.apply(inst, opts.start_time)?;
    }
    inst.exit_initialization_mode()?;
    recorder.sample(inst)?;

    let mut outcome = SimOutcome {
        steps: 0,
        events: 0,
        final_time: opts.start_time,
        terminated: false,
    };

    let mut t = opts.start_time;
    let mut last_recorded = true;
    while t < stop - eps && outcome.steps < opts.max_steps {
        if let Some(inputs) = inputs {
            inputs.apply(inst, t)?;
        }
        let h = opts.step_size.min(stop - t);
        let result = inst.do_step(t, h)?;
        t = result.last_successful_time;
        outcome.steps += 1;
        if result.event_encountered {
            outcome.events += 1;
        }

        if result.terminate {
            outcome.terminated = true;
            break;
        }
        last_recorded = outcome.steps % opts.record_every == 0;
        if last_recorded {
            recorder.sample(inst)?;
        }
    }

    if !last_recorded || outcome.terminated {
        recorder.sample(inst)?;
    }

    outcome.final_time = t;
    inst.terminate()?;
    Ok(outcome)
}

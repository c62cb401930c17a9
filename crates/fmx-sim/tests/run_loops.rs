//! End-to-end runs of the model-exchange and co-simulation drivers.

use fmx_core::{Capabilities, FmuError, FmuResult, InterfaceType, ModelConfig, ValueReference};
use fmx_model::variables::{Causality, Variability, Variable, VariableTable};
use fmx_model::{
    BouncingBall, Dummy, EventUpdate, Float64Sink, Float64Source, HostState, MemoryLogger, Model,
    ModelInstance,
};
use fmx_sim::{
    InputSignals, IntegratorType, Recorder, SimError, SimOptions, run_co_simulation,
    run_model_exchange,
};

/// Schedules one time event at 0.5 s and asks to terminate when it fires.
#[derive(Clone, Debug, Default)]
struct Alarm {
    fired: u32,
}

static ALARM_VARIABLES: VariableTable = VariableTable::new(&[
    Variable::float64(0, "time", Causality::Independent, Variability::Continuous),
    Variable::float64(1, "fired", Causality::Output, Variability::Discrete),
]);

impl Model for Alarm {
    const CONFIG: ModelConfig = ModelConfig {
        identifier: "Alarm",
        instantiation_token: "{alarm}",
        fixed_solver_step: 1e-3,
        default_stop_time: 10.0,
        nx: 0,
        nz: 0,
        capabilities: Capabilities::all(),
    };

    fn variables() -> &'static VariableTable {
        &ALARM_VARIABLES
    }

    fn set_start_values(&mut self) {
        self.fired = 0;
    }

    fn get_float64(
        &self,
        host: &HostState,
        vr: ValueReference,
        out: &mut Float64Sink<'_>,
    ) -> FmuResult<()> {
        match vr.get() {
            0 => out.push(host.time()),
            1 => out.push(f64::from(self.fired)),
            _ => Err(FmuError::GetNotAllowed { vr }),
        }
    }

    fn set_float64(&mut self, vr: ValueReference, _input: &mut Float64Source<'_>) -> FmuResult<()> {
        Err(FmuError::UnexpectedReference { vr })
    }

    fn event_update(&mut self, host: &HostState) -> EventUpdate {
        if host.time() >= 0.5 {
            self.fired += 1;
            EventUpdate {
                terminate: true,
                ..EventUpdate::default()
            }
        } else {
            EventUpdate {
                next_event_time: Some(0.5),
                ..EventUpdate::default()
            }
        }
    }
}

fn instance<M: Model + Default>(interface: InterfaceType) -> ModelInstance<M> {
    ModelInstance::with_model("test", interface, M::default(), MemoryLogger::new()).unwrap()
}

#[test]
fn model_exchange_ball_bounces() {
    let mut inst = instance::<BouncingBall>(InterfaceType::ModelExchange);
    let mut rec = Recorder::new(BouncingBall::variables(), &["h", "v"]).unwrap();
    let opts = SimOptions {
        stop_time: Some(1.0),
        step_size: 1e-3,
        integrator: IntegratorType::RK4,
        ..SimOptions::default()
    };

    let outcome = run_model_exchange(&mut inst, &opts, None, &mut rec).unwrap();

    assert!(!outcome.terminated);
    assert!(outcome.events >= 1, "expected at least one bounce");
    assert!((outcome.final_time - 1.0).abs() < 1e-9);
    assert_eq!(rec.t[0], 0.0);
    assert_eq!(rec.len(), outcome.steps + 1);

    let h = rec.column("h").unwrap();
    assert_eq!(h[0], 1.0);
    assert!(h.iter().all(|&h| h > -0.05), "ball must not sink through the floor");
    assert_eq!(inst.mode(), fmx_model::Mode::Terminated);
}

#[test]
fn model_exchange_euler_and_rk4_agree_before_impact() {
    let run = |integrator| {
        let mut inst = instance::<BouncingBall>(InterfaceType::ModelExchange);
        let mut rec = Recorder::new(BouncingBall::variables(), &["h"]).unwrap();
        let opts = SimOptions {
            stop_time: Some(0.3),
            step_size: 1e-3,
            integrator,
            ..SimOptions::default()
        };
        run_model_exchange(&mut inst, &opts, None, &mut rec).unwrap();
        *rec.column("h").unwrap().last().unwrap()
    };

    let exact = 1.0 - 0.5 * 9.81 * 0.3 * 0.3;
    assert!((run(IntegratorType::RK4) - exact).abs() < 1e-9);
    assert!((run(IntegratorType::ForwardEuler) - exact).abs() < 1e-2);
}

#[test]
fn model_exchange_time_event_terminates() {
    let mut inst = instance::<Alarm>(InterfaceType::ModelExchange);
    let mut rec = Recorder::new(Alarm::variables(), &["fired"]).unwrap();
    let opts = SimOptions {
        step_size: 0.1,
        ..SimOptions::default()
    };

    let outcome = run_model_exchange(&mut inst, &opts, None, &mut rec).unwrap();

    assert!(outcome.terminated);
    assert_eq!(outcome.events, 1);
    assert!((outcome.final_time - 0.5).abs() < 1e-12);
    assert_eq!(inst.model().fired, 1);
    assert_eq!(*rec.column("fired").unwrap().last().unwrap(), 1.0);
}

#[test]
fn co_simulation_time_event_terminates() {
    let mut inst = instance::<Alarm>(InterfaceType::CoSimulation);
    let mut rec = Recorder::new(Alarm::variables(), &["fired"]).unwrap();
    let opts = SimOptions {
        step_size: 0.2,
        ..SimOptions::default()
    };

    let outcome = run_co_simulation(&mut inst, &opts, None, &mut rec).unwrap();

    assert!(outcome.terminated);
    assert!((outcome.final_time - 0.5).abs() < 1e-9);
    assert_eq!(inst.model().fired, 1);
}

#[test]
fn co_simulation_dummy_follows_inputs() {
    let mut inst = instance::<Dummy>(InterfaceType::CoSimulation);
    let inputs = InputSignals::from_names(
        Dummy::variables(),
        &["read_data"],
        &[vec![0.0, 1.0], vec![0.5, 2.0]],
    )
    .unwrap();
    let mut rec = Recorder::new(Dummy::variables(), &["read_data", "increment"]).unwrap();
    let opts = SimOptions {
        stop_time: Some(1.0),
        step_size: 0.1,
        ..SimOptions::default()
    };

    let outcome = run_co_simulation(&mut inst, &opts, Some(&inputs), &mut rec).unwrap();

    assert_eq!(outcome.steps, 10);
    assert!(!outcome.terminated);
    let read = rec.column("read_data").unwrap();
    assert_eq!(read.first(), Some(&1.0));
    assert_eq!(read.last(), Some(&2.0));
    assert!(rec.column("increment").unwrap().iter().all(|&v| v == 1.0));
}

#[test]
fn model_exchange_dummy_is_static() {
    let mut inst = instance::<Dummy>(InterfaceType::ModelExchange);
    let mut rec = Recorder::new(Dummy::variables(), &["write_data"]).unwrap();
    let opts = SimOptions {
        stop_time: Some(0.05),
        step_size: 0.01,
        record_every: 2,
        ..SimOptions::default()
    };

    let outcome = run_model_exchange(&mut inst, &opts, None, &mut rec).unwrap();

    assert_eq!(outcome.events, 0);
    // initial, steps 2 and 4, final
    assert_eq!(rec.len(), 4);
    assert!(rec.column("write_data").unwrap().iter().all(|&v| v == 0.0));
}

#[test]
fn unknown_input_name_rejected() {
    let err = InputSignals::from_names(Dummy::variables(), &["nope"], &[]).unwrap_err();
    assert!(matches!(err, SimError::UnknownVariable { .. }));
}

#[test]
fn model_errors_surface_as_sim_errors() {
    let mut inst = instance::<Dummy>(InterfaceType::CoSimulation);
    // time is read-only, so applying it as an input fails inside the run
    let inputs = InputSignals::from_names(Dummy::variables(), &["time"], &[vec![0.0, 1.0]]).unwrap();
    let mut rec = Recorder::new(Dummy::variables(), &["read_data"]).unwrap();

    let err = run_co_simulation(&mut inst, &SimOptions::default(), Some(&inputs), &mut rec)
        .unwrap_err();
    assert!(matches!(err, SimError::Model(FmuError::ReadOnly { .. })));
}

//! Continuous-state and event behaviour of the bouncing ball.

use fmx_model::models::bouncing_ball::BallVar;
use fmx_model::{BouncingBall, FmuError, InterfaceType, MemoryLogger, Mode, ModelInstance};

fn me_instance() -> (ModelInstance<BouncingBall>, MemoryLogger) {
    let logger = MemoryLogger::new();
    let mut inst = ModelInstance::with_model(
        "ball",
        InterfaceType::ModelExchange,
        BouncingBall::default(),
        logger.clone(),
    )
    .unwrap();
    inst.enter_initialization_mode(0.0, Some(3.0)).unwrap();
    inst.exit_initialization_mode().unwrap();
    inst.event_update().unwrap();
    inst.enter_continuous_time_mode().unwrap();
    (inst, logger)
}

#[test]
fn state_vector_order_is_h_then_v() {
    let (mut inst, _) = me_instance();
    let mut x = [0.0; 2];
    inst.get_continuous_states(&mut x).unwrap();
    assert_eq!(x, [1.0, 0.0]);

    inst.set_continuous_states(&[0.5, -2.0]).unwrap();
    let values = inst
        .get_float64_values(&[BallVar::H.vr(), BallVar::V.vr()])
        .unwrap();
    assert_eq!(values, vec![0.5, -2.0]);

    let mut dx = [0.0; 2];
    inst.get_derivatives(&mut dx).unwrap();
    assert_eq!(dx, [-2.0, -9.81]);
}

#[test]
fn round_trip_leaves_state_unchanged() {
    let (mut inst, _) = me_instance();
    inst.set_continuous_states(&[0.3, 1.7]).unwrap();
    let before = inst.model().clone();

    let mut x = [0.0; 2];
    inst.get_continuous_states(&mut x).unwrap();
    inst.set_continuous_states(&x).unwrap();
    assert_eq!(inst.model(), &before);
}

#[test]
fn non_finite_state_rejected() {
    let (mut inst, logger) = me_instance();
    let err = inst.set_continuous_states(&[f64::NAN, 0.0]).unwrap_err();
    assert!(matches!(err, FmuError::NonFinite { .. }));
    assert_eq!(logger.error_count(), 1);
    assert_eq!(inst.model().h, 1.0);
}

#[test]
fn output_derivatives() {
    let (mut inst, _) = me_instance();
    inst.set_continuous_states(&[0.5, -2.0]).unwrap();
    assert_eq!(inst.get_output_derivative(BallVar::H.vr(), 1).unwrap(), -2.0);
    assert_eq!(inst.get_output_derivative(BallVar::V.vr(), 1).unwrap(), -9.81);
    assert!(inst.get_output_derivative(BallVar::H.vr(), 2).is_err());
    assert!(inst.get_output_derivative(BallVar::G.vr(), 1).is_err());
}

#[test]
fn indicator_crossing_triggers_bounce() {
    let (mut inst, _) = me_instance();
    let mut z = [0.0];
    inst.get_event_indicators(&mut z).unwrap();
    assert!(z[0] > 0.0);

    inst.set_time(0.45).unwrap();
    inst.set_continuous_states(&[-0.01, -4.4]).unwrap();
    inst.get_event_indicators(&mut z).unwrap();
    assert!(z[0] < 0.0);

    inst.enter_event_mode().unwrap();
    let flags = inst.event_update().unwrap();
    assert!(flags.values_of_continuous_states_changed);
    assert!(!flags.terminate_simulation);
    assert!(!flags.next_event_time_defined);

    let mut x = [0.0; 2];
    inst.get_continuous_states(&mut x).unwrap();
    assert!(x[0] > 0.0);
    assert!((x[1] - 3.08).abs() < 1e-9);
}

#[test]
fn co_simulation_bounces_inside_step() {
    let logger = MemoryLogger::new();
    let mut inst = ModelInstance::with_model(
        "ball-cs",
        InterfaceType::CoSimulation,
        BouncingBall::default(),
        logger.clone(),
    )
    .unwrap();
    inst.enter_initialization_mode(0.0, None).unwrap();
    inst.exit_initialization_mode().unwrap();
    assert_eq!(inst.mode(), Mode::StepMode);

    // free fall from 1 m reaches the ground after ~0.45 s
    let result = inst.do_step(0.0, 0.5).unwrap();
    assert!(result.event_encountered);
    assert!(!result.terminate);
    assert_eq!(inst.time(), 0.5);

    let v = inst.get_float64_values(&[BallVar::V.vr()]).unwrap()[0];
    assert!(v > 0.0, "ball should be moving up after the bounce, got {v}");
    assert!(logger.records().is_empty());
}

#[test]
fn do_step_rejects_mismatched_communication_point() {
    let logger = MemoryLogger::new();
    let mut inst = ModelInstance::with_model(
        "ball-cs",
        InterfaceType::CoSimulation,
        BouncingBall::default(),
        logger.clone(),
    )
    .unwrap();
    inst.enter_initialization_mode(0.0, None).unwrap();
    inst.exit_initialization_mode().unwrap();

    assert!(inst.do_step(1.0, 0.1).is_err());
    assert!(inst.do_step(0.0, 0.0).is_err());
    assert_eq!(logger.error_count(), 2);
}

#[test]
fn snapshot_restores_mid_flight() {
    let mut inst = ModelInstance::with_model(
        "ball-cs",
        InterfaceType::CoSimulation,
        BouncingBall::default(),
        MemoryLogger::new(),
    )
    .unwrap();
    inst.enter_initialization_mode(0.0, None).unwrap();
    inst.exit_initialization_mode().unwrap();
    inst.do_step(0.0, 0.1).unwrap();

    let snap = inst.snapshot().unwrap();
    let h_before = inst.model().h;
    inst.do_step(0.1, 0.1).unwrap();
    assert!(inst.model().h < h_before);

    inst.restore(&snap).unwrap();
    assert_eq!(inst.time(), snap.time());
    assert_eq!(inst.model().h, h_before);
    inst.do_step(0.1, 0.1).unwrap();
}

#[test]
fn relifted_ball_falls_again() {
    let (mut inst, logger) = me_instance();
    inst.set_time(1.0).unwrap();
    inst.set_continuous_states(&[-1e-6, -0.05]).unwrap();
    inst.enter_event_mode().unwrap();
    inst.event_update().unwrap();
    inst.enter_continuous_time_mode().unwrap();

    let mut dx = [1.0; 2];
    inst.get_derivatives(&mut dx).unwrap();
    assert_eq!(dx, [0.0, 0.0]);
    assert!(inst.model().is_at_rest());

    inst.set_continuous_states(&[1.0, 0.0]).unwrap();
    inst.get_derivatives(&mut dx).unwrap();
    assert_eq!(dx, [0.0, -9.81]);

    // settle again, then lift through the Float64 setter
    inst.set_continuous_states(&[0.0, 0.0]).unwrap();
    inst.get_derivatives(&mut dx).unwrap();
    assert_eq!(dx, [0.0, 0.0]);
    inst.set_float64(&[BallVar::H.vr()], &[2.0]).unwrap();
    inst.get_derivatives(&mut dx).unwrap();
    assert_eq!(dx, [0.0, -9.81]);
    assert_eq!(logger.error_count(), 0);
}

#[test]
fn nominals_are_one_per_state() {
    let (inst, logger) = me_instance();
    let mut nominals = [0.0; 2];
    inst.get_nominals_of_continuous_states(&mut nominals).unwrap();
    assert_eq!(nominals, [1.0, 1.0]);

    let mut short = [0.0; 1];
    let err = inst
        .get_nominals_of_continuous_states(&mut short)
        .unwrap_err();
    assert_eq!(
        err,
        FmuError::DimensionMismatch {
            what: "state nominals",
            expected: 2,
            actual: 1
        }
    );
    assert_eq!(short, [0.0]);
    assert_eq!(logger.error_count(), 1);
}

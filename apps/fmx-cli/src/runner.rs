//! Settings-driven runs of the built-in models.

use fmx_core::{InterfaceType, ValueReference};
use fmx_model::{
    BouncingBall, Causality, Dummy, Model, ModelInstance, TracingLogger, VariableTable,
};
use fmx_sim::{InputSignals, Recorder, SimOutcome, run_co_simulation, run_model_exchange};

use crate::error::{CliError, CliResult};
use crate::settings::{ModelKind, Settings};

/// Recorded samples and the run summary.
pub struct RunReport {
    pub outcome: SimOutcome,
    pub recorder: Recorder,
}

pub fn variables_of(kind: ModelKind) -> &'static VariableTable {
    match kind {
        ModelKind::Dummy => Dummy::variables(),
        ModelKind::BouncingBall => BouncingBall::variables(),
    }
}

pub fn run(settings: &Settings) -> CliResult<RunReport> {
    match settings.model {
        ModelKind::Dummy => {
            let model = if settings.reference_aliasing {
                Dummy::with_reference_aliasing()
            } else {
                Dummy::default()
            };
            run_model(settings, model)
        }
        ModelKind::BouncingBall => run_model(settings, BouncingBall::default()),
    }
}

/// Names recorded when the settings list none: every output.
fn default_outputs(table: &VariableTable) -> Vec<String> {
    table
        .iter()
        .filter(|var| var.causality == Causality::Output)
        .map(|var| var.name.to_string())
        .collect()
}

fn resolve(table: &VariableTable, name: &str) -> CliResult<ValueReference> {
    table
        .by_name(name)
        .map(|var| var.vr)
        .ok_or_else(|| CliError::UnknownVariable {
            name: name.to_string(),
        })
}

fn run_model<M: Model>(settings: &Settings, model: M) -> CliResult<RunReport> {
    let table = M::variables();
    let mut inst = ModelInstance::with_model(
        settings.instance_name.as_str(),
        settings.interface,
        model,
        TracingLogger,
    )?;

    for (name, &value) in &settings.start_values {
        let vr = resolve(table, name)?;
        inst.set_float64(&[vr], &[value])?;
    }

    let inputs = match &settings.input_signals {
        Some(signals) => Some(InputSignals::from_names(table, &signals.names, &signals.data)?),
        None => None,
    };

    let names = if settings.output.is_empty() {
        default_outputs(table)
    } else {
        settings.output.clone()
    };
    let mut recorder = Recorder::new(table, &names)?;

    let opts = settings.sim_options();
    tracing::info!(
        model = M::CONFIG.identifier,
        interface = %settings.interface,
        start = opts.start_time,
        stop = opts.stop_time.unwrap_or(M::CONFIG.default_stop_time),
        "starting run"
    );

    let outcome = match settings.interface {
        InterfaceType::ModelExchange => {
            run_model_exchange(&mut inst, &opts, inputs.as_ref(), &mut recorder)?
        }
        InterfaceType::CoSimulation => {
            run_co_simulation(&mut inst, &opts, inputs.as_ref(), &mut recorder)?
        }
    };
    tracing::info!(
        steps = outcome.steps,
        events = outcome.events,
        final_time = outcome.final_time,
        terminated = outcome.terminated,
        "run finished"
    );

    Ok(RunReport { outcome, recorder })
}

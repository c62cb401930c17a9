//! Run settings file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fmx_core::InterfaceType;
use fmx_sim::{IntegratorType, SimOptions};
use serde::Deserialize;

use crate::error::{CliError, CliResult};

/// Models built into the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Dummy,
    BouncingBall,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegratorChoice {
    #[default]
    Rk4,
    Euler,
}

impl From<IntegratorChoice> for IntegratorType {
    fn from(choice: IntegratorChoice) -> Self {
        match choice {
            IntegratorChoice::Rk4 => IntegratorType::RK4,
            IntegratorChoice::Euler => IntegratorType::ForwardEuler,
        }
    }
}

/// Tabulated inputs: `data` rows are `[time, value per name...]`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSignalSettings {
    pub names: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

fn default_instance_name() -> String {
    "instance".to_string()
}

fn default_step_size() -> f64 {
    1e-3
}

fn default_record_every() -> usize {
    1
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub model: ModelKind,
    pub interface: InterfaceType,
    #[serde(default = "default_instance_name")]
    pub instance_name: String,
    #[serde(default)]
    pub start_time: f64,
    /// Falls back to the model's default stop time.
    #[serde(default)]
    pub stop_time: Option<f64>,
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    #[serde(default)]
    pub integrator: IntegratorChoice,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
    /// Values applied by variable name before initialization.
    #[serde(default)]
    pub start_values: BTreeMap<String, f64>,
    #[serde(default)]
    pub input_signals: Option<InputSignalSettings>,
    /// Variables to record; every output when empty.
    #[serde(default)]
    pub output: Vec<String>,
    /// CSV destination; stdout when unset.
    #[serde(default)]
    pub output_file: Option<PathBuf>,
    /// Dummy only: route write_data and increment writes into read_data.
    #[serde(default)]
    pub reference_aliasing: bool,
}

impl Settings {
    pub fn from_json(text: &str) -> CliResult<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut settings = Self::from_json(&text)?;
        // relative output paths are taken from the settings file's folder
        if let (Some(out), Some(dir)) = (settings.output_file.as_mut(), path.parent()) {
            if out.is_relative() {
                *out = dir.join(&*out);
            }
        }
        Ok(settings)
    }

    fn validate(&self) -> CliResult<()> {
        if self.reference_aliasing && self.model != ModelKind::Dummy {
            return Err(CliError::InvalidSettings {
                what: "reference_aliasing only applies to the dummy model".to_string(),
            });
        }
        if let Some(inputs) = &self.input_signals {
            if inputs.names.is_empty() {
                return Err(CliError::InvalidSettings {
                    what: "input_signals.names must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            start_time: self.start_time,
            stop_time: self.stop_time,
            step_size: self.step_size,
            record_every: self.record_every,
            integrator: self.integrator.into(),
            ..SimOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_settings_use_defaults() {
        let settings =
            Settings::from_json(r#"{ "model": "dummy", "interface": "co-simulation" }"#).unwrap();
        assert_eq!(settings.model, ModelKind::Dummy);
        assert_eq!(settings.interface, InterfaceType::CoSimulation);
        assert_eq!(settings.step_size, 1e-3);
        assert_eq!(settings.stop_time, None);
        assert_eq!(settings.integrator, IntegratorChoice::Rk4);
        assert!(settings.output.is_empty());
    }

    #[test]
    fn full_settings_parse() {
        let text = r#"{
            "model": "bouncing-ball",
            "interface": "model-exchange",
            "instance_name": "ball",
            "stop_time": 2.0,
            "step_size": 0.01,
            "integrator": "euler",
            "start_values": { "h": 2.0, "e": 0.5 },
            "output": ["h", "v"],
            "output_file": "out/ball.csv"
        }"#;
        let settings = Settings::from_json(text).unwrap();
        assert_eq!(settings.model, ModelKind::BouncingBall);
        assert_eq!(settings.start_values["h"], 2.0);
        let opts = settings.sim_options();
        assert_eq!(opts.integrator, IntegratorType::ForwardEuler);
        assert_eq!(opts.stop_time, Some(2.0));
    }

    #[test]
    fn unknown_field_rejected() {
        let err = Settings::from_json(
            r#"{ "model": "dummy", "interface": "co-simulation", "bogus": 1 }"#,
        );
        assert!(matches!(err, Err(CliError::Json(_))));
    }

    #[test]
    fn aliasing_only_for_dummy() {
        let err = Settings::from_json(
            r#"{ "model": "bouncing-ball", "interface": "co-simulation", "reference_aliasing": true }"#,
        );
        assert!(matches!(err, Err(CliError::InvalidSettings { .. })));
    }
}

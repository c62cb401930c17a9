//! Bouncing ball: two continuous states and one event indicator.
//!
//! ```text
//! der(h) = v
//! der(v) = g
//! ```
//!
//! When the ball hits the ground (h crosses zero while falling) the velocity
//! is reversed and damped by `e`. Below `v_min` the ball comes to rest on the
//! ground (h = 0, v = 0), where gravity no longer acts.

use fmx_core::{Capabilities, FmuError, FmuResult, ModelConfig, ValueReference};

use crate::cursor::{Float64Sink, Float64Source};
use crate::instance::HostState;
use crate::model::{EventUpdate, Model};
use crate::variables::{Causality, Variability, Variable, VariableTable};

const V_MIN: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BallVar {
    Time,
    H,
    DerH,
    V,
    DerV,
    G,
    E,
    VMin,
}

impl BallVar {
    pub const fn vr(self) -> ValueReference {
        ValueReference::new(self as u32)
    }

    pub fn from_vr(vr: ValueReference) -> Option<Self> {
        match vr.get() {
            0 => Some(BallVar::Time),
            1 => Some(BallVar::H),
            2 => Some(BallVar::DerH),
            3 => Some(BallVar::V),
            4 => Some(BallVar::DerV),
            5 => Some(BallVar::G),
            6 => Some(BallVar::E),
            7 => Some(BallVar::VMin),
            _ => None,
        }
    }
}

static VARIABLES: VariableTable = VariableTable::new(&[
    Variable::float64(0, "time", Causality::Independent, Variability::Continuous),
    Variable::float64(1, "h", Causality::Output, Variability::Continuous)
        .with_start(1.0)
        .with_state_index(0)
        .with_description("Height above ground (m)"),
    Variable::float64(2, "der(h)", Causality::Local, Variability::Continuous),
    Variable::float64(3, "v", Causality::Output, Variability::Continuous)
        .with_start(0.0)
        .with_state_index(1)
        .with_description("Vertical velocity (m/s)"),
    Variable::float64(4, "der(v)", Causality::Local, Variability::Continuous),
    Variable::float64(5, "g", Causality::Parameter, Variability::Fixed)
        .with_start(-9.81)
        .with_description("Gravitational acceleration (m/s2)"),
    Variable::float64(6, "e", Causality::Parameter, Variability::Tunable)
        .with_start(0.7)
        .with_description("Coefficient of restitution"),
    Variable::float64(7, "v_min", Causality::Local, Variability::Constant).with_start(V_MIN),
]);

#[derive(Clone, Debug, PartialEq)]
pub struct BouncingBall {
    pub h: f64,
    pub v: f64,
    pub g: f64,
    pub e: f64,
}

impl Default for BouncingBall {
    fn default() -> Self {
        let mut model = Self {
            h: 0.0,
            v: 0.0,
            g: 0.0,
            e: 0.0,
        };
        model.set_start_values();
        model
    }
}

impl BouncingBall {
    /// Lying on the ground. Follows the state, so lifting the ball by setting
    /// `h` or `v` puts gravity back to work.
    pub fn is_at_rest(&self) -> bool {
        self.h <= 0.0 && self.v == 0.0
    }

    fn der_v(&self) -> f64 {
        if self.is_at_rest() { 0.0 } else { self.g }
    }
}

impl Model for BouncingBall {
    const CONFIG: ModelConfig = ModelConfig {
        identifier: "BouncingBall",
        instantiation_token: "{4E6F2A8C-51B3-4D0E-9C7A-2F3B8D1E6A05}",
        fixed_solver_step: 1e-3,
        default_stop_time: 3.0,
        nx: 2,
        nz: 1,
        capabilities: Capabilities::all(),
    };

    fn variables() -> &'static VariableTable {
        &VARIABLES
    }

    fn set_start_values(&mut self) {
        self.h = 1.0;
        self.v = 0.0;
        self.g = -9.81;
        self.e = 0.7;
    }

    fn get_float64(
        &self,
        host: &HostState,
        vr: ValueReference,
        out: &mut Float64Sink<'_>,
    ) -> FmuResult<()> {
        let value = match BallVar::from_vr(vr) {
            Some(BallVar::Time) => host.time(),
            Some(BallVar::H) => self.h,
            Some(BallVar::DerH) => self.v,
            Some(BallVar::V) => self.v,
            Some(BallVar::DerV) => self.der_v(),
            Some(BallVar::G) => self.g,
            Some(BallVar::E) => self.e,
            Some(BallVar::VMin) => V_MIN,
            None => return Err(FmuError::GetNotAllowed { vr }),
        };
        out.push(value)
    }

    fn set_float64(&mut self, vr: ValueReference, input: &mut Float64Source<'_>) -> FmuResult<()> {
        let slot = match BallVar::from_vr(vr) {
            Some(BallVar::H) => &mut self.h,
            Some(BallVar::V) => &mut self.v,
            Some(BallVar::G) => &mut self.g,
            Some(BallVar::E) => &mut self.e,
            Some(var @ (BallVar::Time | BallVar::DerH | BallVar::DerV | BallVar::VMin)) => {
                let name = VARIABLES.get(var.vr()).map_or("?", |v| v.name);
                return Err(FmuError::ReadOnly { vr, name });
            }
            None => return Err(FmuError::UnexpectedReference { vr }),
        };
        *slot = input.next_value()?;
        Ok(())
    }

    fn get_output_derivative(&self, _host: &HostState, vr: ValueReference) -> FmuResult<f64> {
        match BallVar::from_vr(vr) {
            Some(BallVar::H) => Ok(self.v),
            Some(BallVar::V) => Ok(self.der_v()),
            _ => Err(FmuError::NoOutputDerivative { vr }),
        }
    }

    fn event_update(&mut self, _host: &HostState) -> EventUpdate {
        if self.h <= 0.0 && self.v < 0.0 {
            self.v = -self.e * self.v;
            if self.v < V_MIN {
                self.h = 0.0;
                self.v = 0.0;
            } else {
                self.h = f64::MIN_POSITIVE;
            }
            EventUpdate {
                values_changed: true,
                ..EventUpdate::default()
            }
        } else {
            EventUpdate::default()
        }
    }

    fn get_continuous_states(&self, x: &mut [f64]) {
        x[0] = self.h;
        x[1] = self.v;
    }

    fn set_continuous_states(&mut self, x: &[f64]) {
        self.h = x[0];
        self.v = x[1];
    }

    fn get_derivatives(&self, _host: &HostState, dx: &mut [f64]) {
        dx[0] = self.v;
        dx[1] = self.der_v();
    }

    fn get_event_indicators(&self, _host: &HostState, z: &mut [f64]) {
        // resting on the ground must not look like a crossing
        z[0] = if self.is_at_rest() { 1.0 } else { self.h };
    }
}

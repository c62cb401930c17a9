//! Continuous-state vector interface.
//!
//! Slot order of the state vector is fixed by the model definition. Every
//! buffer must match the model's NX (states) or NZ (indicators) exactly.

use fmx_core::{FmuError, FmuResult};

use crate::instance::{Mode, ModelInstance};
use crate::model::Model;

impl<M: Model> ModelInstance<M> {
    fn check_len(&self, what: &'static str, expected: usize, actual: usize) -> FmuResult<()> {
        if expected == actual {
            Ok(())
        } else {
            self.fail(FmuError::DimensionMismatch {
                what,
                expected,
                actual,
            })
        }
    }

    /// Copy the model's continuous states into `x`.
    pub fn get_continuous_states(&self, x: &mut [f64]) -> FmuResult<()> {
        self.check_len("continuous states", M::CONFIG.nx, x.len())?;
        self.model.get_continuous_states(x);
        Ok(())
    }

    /// Copy `x` back into the model's continuous states.
    pub fn set_continuous_states(&mut self, x: &[f64]) -> FmuResult<()> {
        self.require("set_continuous_states", &[Mode::ContinuousTimeMode])?;
        self.check_len("continuous states", M::CONFIG.nx, x.len())?;
        if let Some(value) = x.iter().copied().find(|v| !v.is_finite()) {
            return self.fail(FmuError::NonFinite {
                what: "continuous state",
                value,
            });
        }
        self.model.set_continuous_states(x);
        self.dirty = true;
        Ok(())
    }

    pub fn get_nominals_of_continuous_states(&self, nominals: &mut [f64]) -> FmuResult<()> {
        self.check_len("state nominals", M::CONFIG.nx, nominals.len())?;
        self.model.get_nominals_of_continuous_states(nominals);
        Ok(())
    }

    /// Time derivatives of the continuous states, in state-vector order.
    pub fn get_derivatives(&mut self, dx: &mut [f64]) -> FmuResult<()> {
        self.check_len("state derivatives", M::CONFIG.nx, dx.len())?;
        self.refresh()?;
        self.model.get_derivatives(&self.host, dx);
        Ok(())
    }

    /// Current event indicator values; the host watches their signs.
    pub fn get_event_indicators(&mut self, z: &mut [f64]) -> FmuResult<()> {
        self.check_len("event indicators", M::CONFIG.nz, z.len())?;
        self.refresh()?;
        self.model.get_event_indicators(&self.host, z);
        Ok(())
    }
}

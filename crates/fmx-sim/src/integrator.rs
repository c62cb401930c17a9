//! Fixed-step time integrators.

use fmx_model::{Model, ModelInstance};

use crate::error::SimResult;

/// Right-hand side x_dot = f(t, x) of a continuous system.
pub trait ContinuousSystem {
    /// Evaluate derivatives of `x` at time `t` into `dx`.
    fn rhs(&mut self, t: f64, x: &[f64], dx: &mut [f64]) -> SimResult<()>;
}

/// A model instance in continuous-time mode is a continuous system: the
/// state is pushed into the instance and its derivatives read back.
impl<M: Model> ContinuousSystem for ModelInstance<M> {
    fn rhs(&mut self, t: f64, x: &[f64], dx: &mut [f64]) -> SimResult<()> {
        self.set_time(t)?;
        self.set_continuous_states(x)?;
        self.get_derivatives(dx)?;
        Ok(())
    }
}

/// Trait for time integrators.
pub trait Integrator {
    /// Advance `x` by one time step.
    fn step<S: ContinuousSystem>(
        &self,
        system: &mut S,
        t: f64,
        x: &[f64],
        dt: f64,
    ) -> SimResult<Vec<f64>>;
}

/// x + scale * k
fn axpy(x: &[f64], scale: f64, k: &[f64]) -> Vec<f64> {
    x.iter().zip(k).map(|(xi, ki)| xi + scale * ki).collect()
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<S: ContinuousSystem>(
        &self,
        system: &mut S,
        t: f64,
        x: &[f64],
        dt: f64,
    ) -> SimResult<Vec<f64>> {
        let n = x.len();
        let mut k1 = vec![0.0; n];
        let mut k2 = vec![0.0; n];
        let mut k3 = vec![0.0; n];
        let mut k4 = vec![0.0; n];

        system.rhs(t, x, &mut k1)?;
        system.rhs(t + 0.5 * dt, &axpy(x, 0.5 * dt, &k1), &mut k2)?;
        system.rhs(t + 0.5 * dt, &axpy(x, 0.5 * dt, &k2), &mut k3)?;
        system.rhs(t + dt, &axpy(x, dt, &k3), &mut k4)?;

        // Combine: x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        Ok((0..n)
            .map(|i| x[i] + dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
            .collect())
    }
}

/// Forward Euler (explicit, 1st order).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<S: ContinuousSystem>(
        &self,
        system: &mut S,
        t: f64,
        x: &[f64],
        dt: f64,
    ) -> SimResult<Vec<f64>> {
        let mut dx = vec![0.0; x.len()];
        system.rhs(t, x, &mut dx)?;
        Ok(axpy(x, dt, &dx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dx/dt = -x
    struct Decay {
        calls: usize,
    }

    impl ContinuousSystem for Decay {
        fn rhs(&mut self, _t: f64, x: &[f64], dx: &mut [f64]) -> SimResult<()> {
            self.calls += 1;
            for (d, xi) in dx.iter_mut().zip(x) {
                *d = -xi;
            }
            Ok(())
        }
    }

    #[test]
    fn euler_single_step() {
        let mut sys = Decay { calls: 0 };
        let x = ForwardEuler.step(&mut sys, 0.0, &[1.0, 2.0], 0.1).unwrap();
        assert!((x[0] - 0.9).abs() < 1e-12);
        assert!((x[1] - 1.8).abs() < 1e-12);
        assert_eq!(sys.calls, 1);
    }

    #[test]
    fn rk4_tracks_exponential() {
        let mut sys = Decay { calls: 0 };
        let mut x = vec![1.0];
        let dt = 0.1;
        for i in 0..10 {
            x = RK4.step(&mut sys, i as f64 * dt, &x, dt).unwrap();
        }
        assert!((x[0] - (-1.0_f64).exp()).abs() < 1e-6);
        assert_eq!(sys.calls, 40);
    }

    #[test]
    fn empty_state_is_fine() {
        let mut sys = Decay { calls: 0 };
        assert!(RK4.step(&mut sys, 0.0, &[], 0.1).unwrap().is_empty());
    }
}

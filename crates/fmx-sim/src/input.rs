//! Time-tabulated input signals applied with step-hold.

use fmx_core::ValueReference;
use fmx_model::{Model, ModelInstance, VariableTable};

use crate::error::{SimError, SimResult};

/// Table of input values keyed by time.
///
/// Between rows the previous row holds. Before the first row nothing is
/// applied and the model keeps its own values.
#[derive(Clone, Debug, PartialEq)]
pub struct InputSignals {
    vrs: Vec<ValueReference>,
    times: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

impl InputSignals {
    /// Build from rows of `[time, value_0, value_1, ...]`.
    pub fn new(vrs: Vec<ValueReference>, data: &[Vec<f64>]) -> SimResult<Self> {
        let mut times = Vec::with_capacity(data.len());
        let mut rows = Vec::with_capacity(data.len());
        for (i, row) in data.iter().enumerate() {
            let Some((&t, values)) = row.split_first() else {
                return Err(SimError::InvalidInput {
                    what: format!("row {i} is empty"),
                });
            };
            if values.len() != vrs.len() {
                return Err(SimError::InvalidInput {
                    what: format!(
                        "row {i} has {} values, expected {}",
                        values.len(),
                        vrs.len()
                    ),
                });
            }
            if !t.is_finite() || times.last().is_some_and(|&prev| t < prev) {
                return Err(SimError::InvalidInput {
                    what: format!("row {i} time {t} is not increasing"),
                });
            }
            times.push(t);
            rows.push(values.to_vec());
        }
        Ok(Self { vrs, times, rows })
    }

    /// Build with variable names resolved against a model's table.
    pub fn from_names<S: AsRef<str>>(
        table: &VariableTable,
        names: &[S],
        data: &[Vec<f64>],
    ) -> SimResult<Self> {
        let vrs = names
            .iter()
            .map(|name| {
                table
                    .by_name(name.as_ref())
                    .map(|var| var.vr)
                    .ok_or_else(|| SimError::UnknownVariable {
                        name: name.as_ref().to_string(),
                    })
            })
            .collect::<SimResult<Vec<_>>>()?;
        Self::new(vrs, data)
    }

    /// Values holding at time `t`.
    pub fn values_at(&self, t: f64) -> Option<&[f64]> {
        let n = self.times.partition_point(|&row_t| row_t <= t);
        n.checked_sub(1).map(|i| self.rows[i].as_slice())
    }

    /// Push the values holding at `t` into the instance.
    pub fn apply<M: Model>(&self, inst: &mut ModelInstance<M>, t: f64) -> SimResult<()> {
        if self.vrs.is_empty() {
            return Ok(());
        }
        if let Some(values) = self.values_at(t) {
            inst.set_float64(&self.vrs, values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> InputSignals {
        InputSignals::new(
            vec![ValueReference::new(1)],
            &[vec![0.0, 1.0], vec![0.5, 2.0], vec![1.0, 3.0]],
        )
        .unwrap()
    }

    #[test]
    fn step_hold_lookup() {
        let s = signals();
        assert_eq!(s.values_at(-0.1), None);
        assert_eq!(s.values_at(0.0), Some(&[1.0][..]));
        assert_eq!(s.values_at(0.49), Some(&[1.0][..]));
        assert_eq!(s.values_at(0.5), Some(&[2.0][..]));
        assert_eq!(s.values_at(7.0), Some(&[3.0][..]));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = InputSignals::new(vec![ValueReference::new(1)], &[vec![0.0, 1.0, 2.0]]);
        assert!(matches!(err, Err(SimError::InvalidInput { .. })));
    }

    #[test]
    fn decreasing_time_rejected() {
        let err = InputSignals::new(
            vec![ValueReference::new(1)],
            &[vec![1.0, 1.0], vec![0.5, 2.0]],
        );
        assert!(err.is_err());
    }
}

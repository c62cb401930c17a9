//! Recording of output variables over time.

use std::io::Write;

use fmx_core::ValueReference;
use fmx_model::{Model, ModelInstance, VariableTable};

use crate::error::{SimError, SimResult};

/// Samples named variables from an instance.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    names: Vec<String>,
    vrs: Vec<ValueReference>,
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// One row per time point, columns in `names` order
    pub rows: Vec<Vec<f64>>,
}

impl Recorder {
    pub fn new<S: AsRef<str>>(table: &VariableTable, names: &[S]) -> SimResult<Self> {
        let mut vrs = Vec::with_capacity(names.len());
        for name in names {
            let var = table
                .by_name(name.as_ref())
                .ok_or_else(|| SimError::UnknownVariable {
                    name: name.as_ref().to_string(),
                })?;
            vrs.push(var.vr);
        }
        Ok(Self {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
            vrs,
            t: Vec::new(),
            rows: Vec::new(),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Record the current values at the instance's time.
    pub fn sample<M: Model>(&mut self, inst: &mut ModelInstance<M>) -> SimResult<()> {
        let row = inst.get_float64_values(&self.vrs)?;
        self.t.push(inst.time());
        self.rows.push(row);
        Ok(())
    }

    /// All samples of one variable.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Write `time,<names>` followed by one line per sample.
    pub fn write_csv<W: Write>(&self, mut out: W) -> SimResult<()> {
        write!(out, "time")?;
        for name in &self.names {
            write!(out, ",{name}")?;
        }
        writeln!(out)?;

        for (t, row) in self.t.iter().zip(&self.rows) {
            write!(out, "{t}")?;
            for value in row {
                write!(out, ",{value}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

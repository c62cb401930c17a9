//! Float64 getters and setters.
//!
//! Batch calls walk the value references in order, sharing one cursor over
//! the host buffer. The first failing reference aborts the batch.

use fmx_core::{FmuError, FmuResult, ValueReference};

use crate::cursor::{Float64Sink, Float64Source};
use crate::instance::{Mode, ModelInstance};
use crate::model::Model;

impl<M: Model> ModelInstance<M> {
    /// Read one reference at the sink cursor.
    ///
    /// On failure the cursor is still moved past the attempted slot.
    pub fn get_float64_at(
        &mut self,
        vr: ValueReference,
        out: &mut Float64Sink<'_>,
    ) -> FmuResult<()> {
        self.refresh()?;
        let start = out.index();
        match self.model.get_float64(&self.host, vr, out) {
            Ok(()) => Ok(()),
            Err(err) => {
                out.advance_to(start + 1);
                self.fail(err)
            }
        }
    }

    /// Write one reference from the source cursor.
    ///
    /// On failure the cursor is still moved past the attempted slot.
    pub fn set_float64_at(
        &mut self,
        vr: ValueReference,
        input: &mut Float64Source<'_>,
    ) -> FmuResult<()> {
        if !M::CONFIG.capabilities.set_float64 {
            return self.fail(FmuError::NotSupported { what: "set Float64" });
        }
        self.require(
            "set_float64",
            &[
                Mode::Instantiated,
                Mode::InitializationMode,
                Mode::EventMode,
                Mode::ContinuousTimeMode,
                Mode::StepMode,
            ],
        )?;

        let start = input.index();
        match self.model.set_float64(vr, input) {
            Ok(()) => {
                self.dirty = true;
                Ok(())
            }
            Err(err) => {
                input.advance_to(start + 1);
                self.fail(err)
            }
        }
    }

    /// Read `vrs` into `values`, which must hold exactly one slot per scalar.
    pub fn get_float64(&mut self, vrs: &[ValueReference], values: &mut [f64]) -> FmuResult<()> {
        let mut sink = Float64Sink::new(values);
        for &vr in vrs {
            self.get_float64_at(vr, &mut sink)?;
        }
        if sink.index() != sink.len() {
            return self.fail(FmuError::DimensionMismatch {
                what: "Float64 values",
                expected: sink.len(),
                actual: sink.index(),
            });
        }
        Ok(())
    }

    /// Write `values` into `vrs`; every value must be consumed.
    pub fn set_float64(&mut self, vrs: &[ValueReference], values: &[f64]) -> FmuResult<()> {
        let mut source = Float64Source::new(values);
        for &vr in vrs {
            self.set_float64_at(vr, &mut source)?;
        }
        if source.index() != source.len() {
            return self.fail(FmuError::DimensionMismatch {
                what: "Float64 values",
                expected: source.len(),
                actual: source.index(),
            });
        }
        Ok(())
    }

    /// Convenience getter for scalar-only batches.
    pub fn get_float64_values(&mut self, vrs: &[ValueReference]) -> FmuResult<Vec<f64>> {
        let mut values = vec![0.0; vrs.len()];
        self.get_float64(vrs, &mut values)?;
        Ok(values)
    }

    /// Time derivative of an output. Only `order == 1` is provided.
    pub fn get_output_derivative(&mut self, vr: ValueReference, order: i32) -> FmuResult<f64> {
        if !M::CONFIG.capabilities.get_output_derivative {
            return self.fail(FmuError::NotSupported {
                what: "output derivatives",
            });
        }
        if order != 1 {
            return self.fail(FmuError::UnsupportedDerivativeOrder { vr, order });
        }
        self.refresh()?;
        match self.model.get_output_derivative(&self.host, vr) {
            Ok(value) => Ok(value),
            Err(err) => self.fail(err),
        }
    }

    /// Batch form of `get_output_derivative`. `values` is untouched on failure.
    pub fn get_output_derivatives(
        &mut self,
        vrs: &[ValueReference],
        orders: &[i32],
        values: &mut [f64],
    ) -> FmuResult<()> {
        if orders.len() != vrs.len() || values.len() != vrs.len() {
            return self.fail(FmuError::DimensionMismatch {
                what: "output derivative request",
                expected: vrs.len(),
                actual: orders.len().min(values.len()),
            });
        }
        let mut computed = Vec::with_capacity(vrs.len());
        for (&vr, &order) in vrs.iter().zip(orders) {
            computed.push(self.get_output_derivative(vr, order)?);
        }
        values.copy_from_slice(&computed);
        Ok(())
    }
}

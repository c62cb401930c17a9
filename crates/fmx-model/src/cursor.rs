//! Bounds-checked cursors over host value buffers.
//!
//! A batch of value references is walked one reference at a time; each
//! reference consumes as many scalars as it represents and advances the
//! shared cursor by exactly that count.

use fmx_core::{FmuError, FmuResult};

/// Write cursor for Float64 getters.
#[derive(Debug)]
pub struct Float64Sink<'a> {
    values: &'a mut [f64],
    index: usize,
}

impl<'a> Float64Sink<'a> {
    pub fn new(values: &'a mut [f64]) -> Self {
        Self { values, index: 0 }
    }

    /// Number of slots consumed so far.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write one value at the cursor and advance.
    pub fn push(&mut self, value: f64) -> FmuResult<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(self.index)
            .ok_or(FmuError::CursorOutOfBounds {
                index: self.index,
                len,
            })?;
        *slot = value;
        self.index += 1;
        Ok(())
    }

    /// Move the cursor to `index` without writing, never past the end.
    pub(crate) fn advance_to(&mut self, index: usize) {
        self.index = index.min(self.values.len()).max(self.index);
    }
}

/// Read cursor for Float64 setters.
#[derive(Debug)]
pub struct Float64Source<'a> {
    values: &'a [f64],
    index: usize,
}

impl<'a> Float64Source<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        Self { values, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read one value at the cursor and advance.
    pub fn next_value(&mut self) -> FmuResult<f64> {
        let value = *self
            .values
            .get(self.index)
            .ok_or(FmuError::CursorOutOfBounds {
                index: self.index,
                len: self.values.len(),
            })?;
        self.index += 1;
        Ok(value)
    }

    pub(crate) fn advance_to(&mut self, index: usize) {
        self.index = index.min(self.values.len()).max(self.index);
    }
}

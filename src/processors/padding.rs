use crate::error::{ProcessingError, Result};
use crate::processors::reduction::ReduceOp;

/// Aligns a temperature buffer to a whole number of work-groups.
#[derive(Debug, Clone, Copy)]
pub struct WorkGroupPadder {
    group_size: usize,
}

/// A buffer whose length is a multiple of the work-group size.
///
/// The tail is filled with the identity of the operator it was padded for,
/// so it can only be reduced under that operator.
#[derive(Debug, Clone)]
pub struct PaddedBuffer {
    data: Vec<i32>,
    original_len: usize,
    group_size: usize,
    op: ReduceOp,
}

impl WorkGroupPadder {
    pub fn new(group_size: usize) -> Result<Self> {
        if group_size == 0 {
            return Err(ProcessingError::Config(
                "Work-group size must be at least 1".to_string(),
            ));
        }
        Ok(Self { group_size })
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Number of identity elements needed to round `len` up to a whole group.
    pub fn padding_for(&self, len: usize) -> usize {
        match len % self.group_size {
            0 => 0,
            remainder => self.group_size - remainder,
        }
    }

    pub fn pad(&self, values: &[i32], op: ReduceOp) -> PaddedBuffer {
        let padding = self.padding_for(values.len());
        let mut data = Vec::with_capacity(values.len() + padding);
        data.extend_from_slice(values);
        data.resize(values.len() + padding, op.identity());

        PaddedBuffer {
            data,
            original_len: values.len(),
            group_size: self.group_size,
            op,
        }
    }
}

impl PaddedBuffer {
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original_len == 0
    }

    pub fn original_len(&self) -> usize {
        self.original_len
    }

    pub fn padding_len(&self) -> usize {
        self.data.len() - self.original_len
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn group_count(&self) -> usize {
        self.data.len() / self.group_size
    }

    pub fn op(&self) -> ReduceOp {
        self.op
    }
}

//! Work-group reduction of temperature buffers.
//!
//! A pass pads the buffer to whole work-groups, folds every group in parallel
//! into one partial, and then combines the partials in a single sequential
//! step once every group has finished. Because each operator is associative
//! and commutative and padding carries its identity, the result does not
//! depend on the group size or on the order groups complete in.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::processors::padding::{PaddedBuffer, WorkGroupPadder};
use crate::utils::cancel::CancellationToken;
use crate::utils::constants::{KERNEL_MAX, KERNEL_MIN, KERNEL_SUM};

/// The closed set of reduction operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceOp {
    Min,
    Max,
    Sum,
}

impl ReduceOp {
    pub const ALL: [ReduceOp; 3] = [ReduceOp::Min, ReduceOp::Max, ReduceOp::Sum];

    /// Element `e` with `combine(e, x) == x` for every element `x`.
    pub fn identity(&self) -> i32 {
        match self {
            ReduceOp::Min => i32::MAX,
            ReduceOp::Max => i32::MIN,
            ReduceOp::Sum => 0,
        }
    }

    /// Combine two partials. Accumulation is widened to `i64` so sums of
    /// large buffers cannot overflow the element type.
    #[inline]
    pub fn combine(&self, acc: i64, value: i64) -> i64 {
        match self {
            ReduceOp::Min => acc.min(value),
            ReduceOp::Max => acc.max(value),
            ReduceOp::Sum => acc + value,
        }
    }

    /// Fold one work-group into its partial result.
    #[inline]
    pub fn fold_group(&self, group: &[i32]) -> i64 {
        group
            .iter()
            .fold(self.identity() as i64, |acc, &v| self.combine(acc, v as i64))
    }

    pub fn kernel_name(&self) -> &'static str {
        match self {
            ReduceOp::Min => KERNEL_MIN,
            ReduceOp::Max => KERNEL_MAX,
            ReduceOp::Sum => KERNEL_SUM,
        }
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kernel_name())
    }
}

pub struct ReductionEngine {
    padder: WorkGroupPadder,
    cancel: Option<CancellationToken>,
}

impl ReductionEngine {
    pub fn new(group_size: usize) -> Result<Self> {
        Ok(Self {
            padder: WorkGroupPadder::new(group_size)?,
            cancel: None,
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn group_size(&self) -> usize {
        self.padder.group_size()
    }

    /// Reduce the original elements of `values` under `op`.
    pub fn reduce(&self, values: &[i32], op: ReduceOp) -> Result<i64> {
        if values.is_empty() {
            return Err(ProcessingError::empty(&format!("{} reduction", op)));
        }
        let padded = self.padder.pad(values, op);
        self.reduce_padded(&padded, op)
    }

    /// Reduce a buffer that has already been padded for `op`.
    pub fn reduce_padded(&self, padded: &PaddedBuffer, op: ReduceOp) -> Result<i64> {
        if padded.is_empty() {
            return Err(ProcessingError::empty(&format!("{} reduction", op)));
        }
        if padded.op() != op {
            return Err(ProcessingError::Execution {
                kernel: op.kernel_name().to_string(),
                message: format!("buffer was padded with the {} identity", padded.op()),
            });
        }
        let group_size = self.group_size();
        if padded.group_size() != group_size || padded.len() % group_size != 0 {
            return Err(ProcessingError::Execution {
                kernel: op.kernel_name().to_string(),
                message: format!(
                    "buffer of {} elements is not aligned to work-groups of {}",
                    padded.len(),
                    group_size
                ),
            });
        }

        let partials = self.reduce_groups(padded.as_slice(), op)?;

        debug!(
            kernel = op.kernel_name(),
            groups = partials.len(),
            padding = padded.padding_len(),
            "combining work-group partials"
        );

        Ok(partials
            .into_iter()
            .fold(op.identity() as i64, |acc, partial| op.combine(acc, partial)))
    }

    /// Sum divided by the original (unpadded) element count, in tenths.
    pub fn average(&self, values: &[i32]) -> Result<f64> {
        let sum = self.reduce(values, ReduceOp::Sum)?;
        Ok(sum as f64 / values.len() as f64)
    }

    /// One partial per work-group. Groups share nothing until the caller
    /// combines the returned partials.
    fn reduce_groups(&self, data: &[i32], op: ReduceOp) -> Result<Vec<i64>> {
        data.par_chunks_exact(self.group_size())
            .map(|group| {
                if let Some(token) = &self.cancel {
                    token.check()?;
                }
                Ok(op.fold_group(group))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_buffer() -> Vec<i32> {
        // Mixed-sign tenths, deliberately not a multiple of common group sizes
        (0..203).map(|i| ((i * 37) % 251) - 120).collect()
    }

    #[test]
    fn test_identity_is_neutral() {
        for op in ReduceOp::ALL {
            for x in [-400i64, 0, 1, 355] {
                assert_eq!(op.combine(op.identity() as i64, x), x, "{}", op);
            }
        }
    }

    #[test]
    fn test_min_max_bound_every_element() {
        let values = sample_buffer();
        let engine = ReductionEngine::new(64).unwrap();
        let min = engine.reduce(&values, ReduceOp::Min).unwrap();
        let max = engine.reduce(&values, ReduceOp::Max).unwrap();

        for &v in &values {
            assert!(min <= v as i64 && v as i64 <= max);
        }
        assert_eq!(min, *values.iter().min().unwrap() as i64);
        assert_eq!(max, *values.iter().max().unwrap() as i64);
    }

    #[test]
    fn test_sum_independent_of_group_size() {
        let values = sample_buffer();
        let expected: i64 = values.iter().map(|&v| v as i64).sum();

        for group_size in [1, 7, 64, values.len()] {
            let engine = ReductionEngine::new(group_size).unwrap();
            assert_eq!(
                engine.reduce(&values, ReduceOp::Sum).unwrap(),
                expected,
                "group size {}",
                group_size
            );
        }
    }

    #[test]
    fn test_padding_does_not_change_results() {
        // All-negative data: zero padding would corrupt max
        let negative: Vec<i32> = vec![-52, -31, -77, -4, -19];
        // All-positive data: zero padding would corrupt min
        let positive: Vec<i32> = vec![52, 31, 77, 4, 19];

        let engine = ReductionEngine::new(4).unwrap();
        let padder = WorkGroupPadder::new(4).unwrap();

        for values in [negative, positive] {
            let single = ReductionEngine::new(values.len()).unwrap();
            for op in ReduceOp::ALL {
                let padded = padder.pad(&values, op);
                assert_eq!(padded.padding_len(), 3);
                assert_eq!(
                    engine.reduce_padded(&padded, op).unwrap(),
                    single.reduce(&values, op).unwrap(),
                    "{}",
                    op
                );
            }
        }
    }

    #[test]
    fn test_average_divides_by_original_count() {
        let engine = ReductionEngine::new(64).unwrap();
        // 3 elements padded to 64: dividing by 64 would give ~0.94
        assert_eq!(engine.average(&[10, 20, 60]).unwrap(), 30.0);

        let engine = ReductionEngine::new(4).unwrap();
        assert_eq!(engine.average(&[10, 20, 30, 40]).unwrap(), 25.0);
    }

    #[test]
    fn test_empty_buffer_is_an_error() {
        let engine = ReductionEngine::new(64).unwrap();
        for op in ReduceOp::ALL {
            assert!(matches!(
                engine.reduce(&[], op),
                Err(ProcessingError::EmptyInput { .. })
            ));
        }
        assert!(engine.average(&[]).is_err());
    }

    #[test]
    fn test_mismatched_padding_rejected() {
        let engine = ReductionEngine::new(4).unwrap();
        let padded = WorkGroupPadder::new(4).unwrap().pad(&[1, 2, 3], ReduceOp::Sum);
        assert!(matches!(
            engine.reduce_padded(&padded, ReduceOp::Min),
            Err(ProcessingError::Execution { .. })
        ));

        let other = WorkGroupPadder::new(3).unwrap().pad(&[1, 2, 3], ReduceOp::Sum);
        assert!(engine.reduce_padded(&other, ReduceOp::Sum).is_err());
    }

    #[test]
    fn test_cancelled_pass_stops() {
        let token = CancellationToken::new();
        token.cancel();
        let engine = ReductionEngine::new(8).unwrap().with_cancellation(token);
        assert!(matches!(
            engine.reduce(&sample_buffer(), ReduceOp::Max),
            Err(ProcessingError::Cancelled)
        ));
    }
}

use rayon::prelude::*;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{BinLayout, Histogram};
use crate::utils::cancel::CancellationToken;

/// Tallies a temperature buffer into bins spanning a known `[min, max]`.
///
/// Each rayon split owns a private count array that it fills one work-group
/// at a time; the arrays are merged by element-wise sum at the end, so no
/// two workers ever write to the same counter.
pub struct HistogramEngine {
    group_size: usize,
    cancel: Option<CancellationToken>,
}

impl HistogramEngine {
    pub fn new(group_size: usize) -> Result<Self> {
        if group_size == 0 {
            return Err(ProcessingError::Config(
                "Work-group size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            group_size,
            cancel: None,
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Count `values` into `bins` bins over `[min, max]`.
    ///
    /// `values` must be the original, unpadded buffer. Elements outside the
    /// range are not counted.
    pub fn compute(&self, values: &[i32], bins: usize, min: i32, max: i32) -> Result<Histogram> {
        let layout = BinLayout::new(min, max, bins)?;
        if values.is_empty() {
            return Err(ProcessingError::empty("histogram"));
        }

        let counts = self.tally(values, &layout)?;

        debug!(
            bins,
            width = layout.width,
            groups = values.len().div_ceil(self.group_size),
            "histogram partitions merged"
        );

        Histogram::new(layout, counts)
    }

    fn tally(&self, values: &[i32], layout: &BinLayout) -> Result<Vec<u64>> {
        let bins = layout.bins;

        values
            .par_chunks(self.group_size)
            .try_fold(
                || vec![0u64; bins],
                |mut local, group| {
                    if let Some(token) = &self.cancel {
                        token.check()?;
                    }
                    for &value in group {
                        if let Some(index) = layout.index_of(value) {
                            local[index] += 1;
                        }
                    }
                    Ok::<_, ProcessingError>(local)
                },
            )
            .try_reduce(
                || vec![0u64; bins],
                |mut merged, local| {
                    for (total, count) in merged.iter_mut().zip(local) {
                        *total += count;
                    }
                    Ok(merged)
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_bin_scenario() {
        let engine = HistogramEngine::new(4).unwrap();
        let histogram = engine.compute(&[10, 20, 30, 40], 2, 10, 40).unwrap();

        assert_eq!(histogram.layout.width, 15.0);
        assert_eq!(histogram.counts, vec![2, 2]);
    }

    #[test]
    fn test_counts_sum_to_element_count() {
        let values: Vec<i32> = (0..1000).map(|i| ((i * 7919) % 613) - 300).collect();
        let min = *values.iter().min().unwrap();
        let max = *values.iter().max().unwrap();

        for group_size in [1, 7, 64] {
            let engine = HistogramEngine::new(group_size).unwrap();
            for bins in [1, 2, 3, 10, 64, 999] {
                let histogram = engine.compute(&values, bins, min, max).unwrap();
                assert_eq!(histogram.counts.len(), bins);
                assert_eq!(histogram.total(), values.len() as u64);
            }
        }
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let engine = HistogramEngine::new(64).unwrap();
        let histogram = engine.compute(&[0, 99, 100], 4, 0, 100).unwrap();
        assert_eq!(histogram.counts, vec![1, 0, 0, 2]);
    }

    #[test]
    fn test_out_of_range_elements_are_ignored() {
        let engine = HistogramEngine::new(2).unwrap();
        let histogram = engine.compute(&[-50, 0, 5, 10, 500], 2, 0, 10).unwrap();
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.counts, vec![1, 2]);
    }

    #[test]
    fn test_single_value_range() {
        let engine = HistogramEngine::new(64).unwrap();
        let histogram = engine.compute(&[-12, -12, -12], 5, -12, -12).unwrap();
        assert_eq!(histogram.counts, vec![3, 0, 0, 0, 0]);
    }

    #[test]
    fn test_invalid_inputs() {
        let engine = HistogramEngine::new(64).unwrap();
        assert!(matches!(
            engine.compute(&[1, 2], 0, 1, 2),
            Err(ProcessingError::Config(_))
        ));
        assert!(matches!(
            engine.compute(&[], 3, 0, 0),
            Err(ProcessingError::EmptyInput { .. })
        ));
        assert!(HistogramEngine::new(0).is_err());
    }

    #[test]
    fn test_cancelled_histogram() {
        let token = CancellationToken::new();
        token.cancel();
        let engine = HistogramEngine::new(4).unwrap().with_cancellation(token);
        assert!(matches!(
            engine.compute(&[1, 2, 3, 4, 5], 2, 1, 5),
            Err(ProcessingError::Cancelled)
        ));
    }
}

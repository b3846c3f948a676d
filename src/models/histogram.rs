use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::observation::fixed_to_degrees;

/// Bin boundaries derived from a global min/max and a bin count.
///
/// Bin `i` covers `[min + i*width, min + (i+1)*width)`; the last bin is closed
/// so that `max` itself is counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinLayout {
    pub min: i32,
    pub max: i32,
    pub bins: usize,
    pub width: f64,
}

impl BinLayout {
    pub fn new(min: i32, max: i32, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(ProcessingError::Config(
                "Histogram bin count must be a positive integer".to_string(),
            ));
        }
        if min > max {
            return Err(ProcessingError::InvalidFormat(format!(
                "Histogram range is inverted: min {} > max {}",
                min, max
            )));
        }

        Ok(Self {
            min,
            max,
            bins,
            width: (max as f64 - min as f64) / bins as f64,
        })
    }

    /// Bin for `value`, or `None` when it lies outside `[min, max]`.
    ///
    /// With a zero-width range every in-range value lands in bin 0.
    #[inline]
    pub fn index_of(&self, value: i32) -> Option<usize> {
        if value < self.min || value > self.max {
            return None;
        }
        if self.width == 0.0 {
            return Some(0);
        }

        let offset = (value as f64 - self.min as f64) / self.width;
        Some((offset.floor() as usize).min(self.bins - 1))
    }

    /// Lower bound of bin `index`, in tenths.
    pub fn lower(&self, index: usize) -> f64 {
        self.min as f64 + index as f64 * self.width
    }

    /// Upper bound of bin `index`, in tenths.
    pub fn upper(&self, index: usize) -> f64 {
        self.min as f64 + (index + 1) as f64 * self.width
    }
}

/// One rendered row of a histogram, bounds in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub layout: BinLayout,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn new(layout: BinLayout, counts: Vec<u64>) -> Result<Self> {
        if counts.len() != layout.bins {
            return Err(ProcessingError::InvalidFormat(format!(
                "Histogram has {} counts for {} bins",
                counts.len(),
                layout.bins
            )));
        }
        Ok(Self { layout, counts })
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn bins(&self) -> impl Iterator<Item = HistogramBin> + '_ {
        self.counts.iter().enumerate().map(|(index, &count)| HistogramBin {
            index,
            lower: fixed_to_degrees(self.layout.lower(index)),
            upper: fixed_to_degrees(self.layout.upper(index)),
            count,
        })
    }

    /// Bar length for `count`, scaled so the fullest bin spans `bar_width`.
    pub fn bar_length(&self, count: u64, bar_width: usize) -> usize {
        let max_count = self.max_count();
        if max_count == 0 {
            return 0;
        }
        (count as f64 / max_count as f64 * bar_width as f64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_boundaries() {
        let layout = BinLayout::new(10, 40, 2).unwrap();
        assert_eq!(layout.width, 15.0);
        assert_eq!(layout.index_of(10), Some(0));
        assert_eq!(layout.index_of(20), Some(0));
        assert_eq!(layout.index_of(25), Some(1));
        assert_eq!(layout.index_of(30), Some(1));
        // max is clamped into the last bin rather than bin B
        assert_eq!(layout.index_of(40), Some(1));
        assert_eq!(layout.index_of(9), None);
        assert_eq!(layout.index_of(41), None);
        assert_eq!(layout.lower(1), 25.0);
        assert_eq!(layout.upper(1), 40.0);
    }

    #[test]
    fn test_zero_width_layout() {
        let layout = BinLayout::new(-15, -15, 4).unwrap();
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.index_of(-15), Some(0));
        assert_eq!(layout.index_of(-14), None);
    }

    #[test]
    fn test_layout_rejects_zero_bins() {
        assert!(matches!(
            BinLayout::new(0, 10, 0),
            Err(ProcessingError::Config(_))
        ));
        assert!(BinLayout::new(10, 0, 3).is_err());
    }

    #[test]
    fn test_bar_length_scales_to_fullest_bin() {
        let layout = BinLayout::new(0, 100, 4).unwrap();
        let histogram = Histogram::new(layout, vec![5, 10, 0, 0]).unwrap();
        assert_eq!(histogram.total(), 15);
        assert_eq!(histogram.bar_length(10, 60), 60);
        assert_eq!(histogram.bar_length(5, 60), 30);
        assert_eq!(histogram.bar_length(0, 60), 0);

        let bins: Vec<HistogramBin> = histogram.bins().collect();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[1].upper, 5.0);
        assert_eq!(bins[3].upper, 10.0);

        assert!(Histogram::new(layout, vec![1, 2]).is_err());
    }
}

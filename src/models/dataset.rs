use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::utils::constants::MAX_RETAINED_ERRORS;

/// Line accounting for one pass over a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines_read: usize,
    pub blank_lines: usize,
    pub records_matched: usize,
    pub records_filtered: usize,
    pub lines_skipped: usize,
    /// The first few parse failures, kept for the report.
    pub errors: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&mut self, error: &ProcessingError) {
        self.lines_skipped += 1;
        if self.errors.len() < MAX_RETAINED_ERRORS {
            self.errors.push(error.to_string());
        }
    }

    /// Share of non-blank lines that parsed (matched or filtered out), as a percentage.
    pub fn success_rate(&self) -> f64 {
        let attempted = self.lines_read - self.blank_lines;
        if attempted == 0 {
            0.0
        } else {
            ((attempted - self.lines_skipped) as f64 / attempted as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Lines read: {}\n\
            Records matched: {}\n\
            Records filtered out: {}\n\
            Lines skipped: {} ({:.1}% parsed)",
            self.lines_read,
            self.records_matched,
            self.records_filtered,
            self.lines_skipped,
            self.success_rate()
        )
    }
}

/// The in-memory buffers built from the records that passed the filters.
///
/// `temperatures[i]` and `months[i]` come from the same record.
#[derive(Debug, Clone, Default)]
pub struct ObservationSet {
    pub temperatures: Vec<i32>,
    pub months: Vec<u8>,
    pub stats: ParseStats,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observation: &Observation) {
        self.temperatures.push(observation.temperature);
        self.months.push(observation.month);
        self.stats.records_matched += 1;
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    /// Fail with the observed line counts when nothing survived filtering.
    pub fn require_records(&self, stage: &str) -> Result<()> {
        if self.is_empty() {
            return Err(ProcessingError::EmptyInput {
                stage: stage.to_string(),
                lines_read: self.stats.lines_read,
                lines_skipped: self.stats.lines_skipped,
                records_matched: self.stats.records_matched,
            });
        }
        Ok(())
    }

    /// Temperatures grouped by calendar month, months in ascending order.
    pub fn by_month(&self) -> BTreeMap<u8, Vec<i32>> {
        let mut grouped: BTreeMap<u8, Vec<i32>> = BTreeMap::new();
        for (&month, &temperature) in self.months.iter().zip(&self.temperatures) {
            grouped.entry(month).or_default().push(temperature);
        }
        grouped
    }
}

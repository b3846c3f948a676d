use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::observation::fixed_to_degrees;

/// Scalar statistics of one temperature buffer, all in tenths of a degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    /// Number of original (unpadded) elements.
    pub count: usize,
    pub min: i32,
    pub max: i32,
    pub sum: i64,
    /// `sum / count`, still in tenths.
    pub average: f64,
}

impl TemperatureSummary {
    pub fn new(count: usize, min: i32, max: i32, sum: i64) -> Result<Self> {
        if count == 0 {
            return Err(ProcessingError::empty("temperature summary"));
        }
        if min > max {
            return Err(ProcessingError::InvalidFormat(format!(
                "Minimum {} exceeds maximum {}",
                min, max
            )));
        }

        Ok(Self {
            count,
            min,
            max,
            sum,
            average: sum as f64 / count as f64,
        })
    }

    pub fn min_degrees(&self) -> f64 {
        fixed_to_degrees(self.min as f64)
    }

    pub fn max_degrees(&self) -> f64 {
        fixed_to_degrees(self.max as f64)
    }

    pub fn average_degrees(&self) -> f64 {
        fixed_to_degrees(self.average)
    }
}

/// Summary of the observations recorded in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u8,
    pub summary: TemperatureSummary,
}

impl MonthlySummary {
    pub fn month_name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Unknown",
        }
    }
}

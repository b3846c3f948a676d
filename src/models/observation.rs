use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::TEMPERATURE_SCALE;

/// One parsed line of the observation dataset.
///
/// `temperature` is fixed-point in tenths of a degree, so `12.5` is stored as `125`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Observation {
    #[validate(length(min = 1))]
    pub station: String,

    pub year: i32,

    #[validate(range(min = 1, max = 12))]
    pub month: u8,

    #[validate(range(min = 1, max = 31))]
    pub day: u8,

    pub time: u32,

    pub temperature: i32,
}

impl Observation {
    pub fn new(station: String, year: i32, month: u8, day: u8, time: u32, temperature: i32) -> Self {
        Self {
            station,
            year,
            month,
            day,
            time,
            temperature,
        }
    }
}

/// Scale a decimal reading to tenths, rounding to the nearest tenth.
pub fn to_fixed_point(degrees: f64) -> Result<i32> {
    if !degrees.is_finite() {
        return Err(ProcessingError::InvalidFormat(format!(
            "Temperature is not a finite number: {}",
            degrees
        )));
    }

    let scaled = (degrees * TEMPERATURE_SCALE as f64).round();
    if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
        return Err(ProcessingError::InvalidFormat(format!(
            "Temperature {} is outside the representable range",
            degrees
        )));
    }

    Ok(scaled as i32)
}

pub fn fixed_to_degrees(tenths: f64) -> f64 {
    tenths / TEMPERATURE_SCALE as f64
}

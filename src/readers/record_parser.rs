use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{to_fixed_point, FilterCriteria, Observation};
use crate::utils::constants::{DEFAULT_DELIMITER, FIELD_COUNT};

/// Splits observation lines into fields and applies the filter criteria.
#[derive(Debug, Clone)]
pub struct RecordParser {
    delimiter: char,
    criteria: FilterCriteria,
}

impl RecordParser {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            criteria,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Split `line` into exactly six positional fields.
    ///
    /// Runs of the delimiter count as one separator, and a trailing carriage
    /// return is ignored.
    pub fn split_fields<'a>(&self, line: &'a str, line_number: usize) -> Result<[&'a str; FIELD_COUNT]> {
        let mut fields = [""; FIELD_COUNT];
        let mut count = 0;

        for token in line
            .trim_end_matches(|c: char| c == '\r' || c == '\n')
            .split(self.delimiter)
            .filter(|token| !token.is_empty())
        {
            if count == FIELD_COUNT {
                return Err(ProcessingError::Parse {
                    line: line_number,
                    message: format!("expected {} fields, found more", FIELD_COUNT),
                });
            }
            fields[count] = token;
            count += 1;
        }

        if count != FIELD_COUNT {
            return Err(ProcessingError::Parse {
                line: line_number,
                message: format!("expected {} fields, found {}", FIELD_COUNT, count),
            });
        }

        Ok(fields)
    }

    /// Parse one line. `Ok(None)` means the record did not match the filters
    /// and was dropped before any numeric decoding.
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<Option<Observation>> {
        let fields = self.split_fields(line, line_number)?;

        if !self.criteria.matches(&fields) {
            return Ok(None);
        }

        let year = parse_field::<i32>(fields[1], "year", line_number)?;
        let month = parse_field::<u8>(fields[2], "month", line_number)?;
        let day = parse_field::<u8>(fields[3], "day", line_number)?;
        let time = parse_field::<u32>(fields[4], "time", line_number)?;
        let degrees = parse_field::<f64>(fields[5], "temperature", line_number)?;
        let temperature = to_fixed_point(degrees).map_err(|e| ProcessingError::Parse {
            line: line_number,
            message: e.to_string(),
        })?;

        let observation =
            Observation::new(fields[0].to_string(), year, month, day, time, temperature);
        observation
            .validate()
            .map_err(|e| ProcessingError::Parse {
                line: line_number,
                message: e.to_string(),
            })?;

        Ok(Some(observation))
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, name: &str, line_number: usize) -> Result<T> {
    raw.parse::<T>().map_err(|_| ProcessingError::Parse {
        line: line_number,
        message: format!("invalid {}: '{}'", name, raw),
    })
}

//! Interactive prompts for filter criteria and the histogram bin count.
//!
//! Everything is generic over `BufRead`/`Write` so the command layer can pass
//! locked stdin/stdout and tests can pass in-memory buffers.

use std::io::{BufRead, Write};
use tracing::warn;

use crate::error::{ProcessingError, Result};
use crate::models::{FilterCriteria, FilterField};

/// Parse a bin count. Anything that is not a positive integer is a `Config` error.
pub fn parse_bin_count(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    let value: i64 = trimmed.parse().map_err(|_| {
        ProcessingError::Config(format!("'{}' is not a number of histogram bins", trimmed))
    })?;

    if value <= 0 {
        return Err(ProcessingError::Config(format!(
            "Histogram bin count must be above 0, got {}",
            value
        )));
    }

    usize::try_from(value)
        .map_err(|_| ProcessingError::Config(format!("Histogram bin count {} is too large", value)))
}

/// Ask for a bin count until a valid one is entered.
///
/// Fails only if the input ends before a valid answer arrives.
pub fn prompt_bin_count<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<usize> {
    writeln!(output, "Enter number of Histogram Bins")?;
    output.flush()?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(ProcessingError::Config(
                "Input ended before a valid histogram bin count was entered".to_string(),
            ));
        }

        match parse_bin_count(&line) {
            Ok(bins) => return Ok(bins),
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(e) => {
                warn!(error = %e, "rejected bin count");
                writeln!(output, "Invalid Number of bins, please enter a number above 0")?;
                output.flush()?;
            }
        }
    }
}

/// Use `candidate` if it is a valid bin count, otherwise fall back to prompting.
pub fn resolve_bin_count<R: BufRead, W: Write>(
    candidate: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<usize> {
    if let Some(candidate) = candidate {
        match parse_bin_count(candidate) {
            Ok(bins) => return Ok(bins),
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(e) => {
                warn!(error = %e, "bin count from arguments rejected");
                writeln!(output, "{}", e)?;
            }
        }
    }
    prompt_bin_count(input, output)
}

/// Ask for each filter criterion in turn. Blank answers (or end of input)
/// leave the field as a wildcard; only the first word of an answer is used.
pub fn prompt_filter_criteria<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new();
    let mut line = String::new();

    for field in FilterField::ALL {
        writeln!(output, "Enter a {} or leave blank for all", field.label())?;
        output.flush()?;

        line.clear();
        input.read_line(&mut line)?;
        if let Some(value) = line.split_whitespace().next() {
            criteria.set(field, value);
        }
    }

    Ok(criteria)
}

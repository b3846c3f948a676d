use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::FILTER_FIELD_COUNT;

/// The filterable (non-temperature) fields of a record, in positional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Station,
    Year,
    Month,
    Day,
    Time,
}

impl FilterField {
    pub const ALL: [FilterField; FILTER_FIELD_COUNT] = [
        FilterField::Station,
        FilterField::Year,
        FilterField::Month,
        FilterField::Day,
        FilterField::Time,
    ];

    /// Position of the field within a record line.
    pub fn index(&self) -> usize {
        match self {
            FilterField::Station => 0,
            FilterField::Year => 1,
            FilterField::Month => 2,
            FilterField::Day => 3,
            FilterField::Time => 4,
        }
    }

    /// Label used when asking for a criterion interactively.
    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Station => "Weather Station",
            FilterField::Year => "Year",
            FilterField::Month => "Month",
            FilterField::Day => "Day",
            FilterField::Time => "Time",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterField::Station => "station",
            FilterField::Year => "year",
            FilterField::Month => "month",
            FilterField::Day => "day",
            FilterField::Time => "time",
        };
        f.write_str(name)
    }
}

/// Exact-match criteria, one optional value per filterable field.
///
/// An absent (or empty) criterion is a wildcard. Matching compares raw field
/// text byte for byte: `"07"` does not match a month written as `"7"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    criteria: [Option<String>; FILTER_FIELD_COUNT],
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the criterion for `field`. Empty values clear it back to a wildcard.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        self.criteria[field.index()] = if value.is_empty() { None } else { Some(value) };
    }

    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.criteria[field.index()].as_deref()
    }

    pub fn is_wildcard(&self) -> bool {
        self.criteria.iter().all(Option::is_none)
    }

    /// `fields` are the positional fields of a line; only the first five are consulted.
    pub fn matches(&self, fields: &[&str]) -> bool {
        self.criteria
            .iter()
            .zip(fields)
            .all(|(criterion, field)| criterion.as_deref().map_or(true, |c| c == *field))
    }

    /// The active criteria as `(field, value)` pairs.
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &str)> + '_ {
        FilterField::ALL
            .iter()
            .filter_map(move |field| self.get(*field).map(|value| (*field, value)))
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return f.write_str("all records");
        }
        let parts: Vec<String> = self
            .active()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

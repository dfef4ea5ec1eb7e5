//! Sort options and name collation for record listings.

use crate::model::record::Record;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Field used to order records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Locale-aware name order.
    Name,
    /// Creation timestamp order.
    Date,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Unsupported sort field or order text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortParseError {
    Field(String),
    Order(String),
}

impl Display for SortParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(value) => {
                write!(f, "unsupported sort field `{value}`; expected name|date")
            }
            Self::Order(value) => {
                write!(f, "unsupported sort order `{value}`; expected asc|desc")
            }
        }
    }
}

impl Error for SortParseError {}

impl FromStr for SortField {
    type Err = SortParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "date" | "created" | "created_at" => Ok(Self::Date),
            other => Err(SortParseError::Field(other.to_string())),
        }
    }
}

impl FromStr for SortOrder {
    type Err = SortParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(SortParseError::Order(other.to_string())),
        }
    }
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
        }
    }
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Returns a sorted copy of `records`. The sort is stable.
pub fn sort_records(records: &[Record], field: SortField, order: SortOrder) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match field {
            SortField::Name => locale_compare(&a.name, &b.name),
            SortField::Date => a.created_at.cmp(&b.created_at),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Human-oriented string order.
///
/// Letters compare case-insensitively first; on a case-only difference the
/// lowercase form sorts first; remaining ties fall back to code points.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| case_tiebreak(a, b))
        .then_with(|| a.cmp(b))
}

fn case_tiebreak(a: &str, b: &str) -> Ordering {
    for (left, right) in a.chars().zip(b.chars()) {
        if left == right {
            continue;
        }
        if left.is_lowercase() && right.is_uppercase() {
            return Ordering::Less;
        }
        if left.is_uppercase() && right.is_lowercase() {
            return Ordering::Greater;
        }
        return Ordering::Equal;
    }
    Ordering::Equal
}

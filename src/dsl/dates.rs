//! Ordered registry of accepted date formats.
//!
//! Patterns use the `time` crate's format description syntax, e.g.
//! `[year]-[month]-[day]` or `[year]-[month]-[day] [hour]:[minute]`.

use time::format_description::{self, OwnedFormatItem};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use super::error::{EvalError, ParseError};

#[derive(Debug, Clone)]
struct DateFormat {
    pattern: String,
    items: OwnedFormatItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct DateFormats {
    formats: Vec<DateFormat>,
}

impl DateFormats {
    /// Compile and append `pattern`. An invalid pattern is rejected and
    /// leaves the list unchanged.
    pub(crate) fn push(&mut self, pattern: &str) -> Result<(), ParseError> {
        let items = format_description::parse_owned::<1>(pattern).map_err(|e| {
            ParseError::InvalidDateFormat {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;
        tracing::debug!("Registered date format '{}'", pattern);
        self.formats.push(DateFormat {
            pattern: pattern.to_string(),
            items,
        });
        Ok(())
    }

    pub(crate) fn patterns(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|f| f.pattern.as_str())
    }

    /// Parse `text` with the first format that accepts it.
    pub(crate) fn parse(&self, text: &str) -> Result<OffsetDateTime, EvalError> {
        if self.formats.is_empty() {
            return Err(EvalError::NoDateFormat);
        }

        self.formats
            .iter()
            .find_map(|f| parse_with(&f.items, text))
            .ok_or_else(|| EvalError::UnparseableDate(text.to_string()))
    }
}

/// Try the richest interpretation first: with offset, then a naive
/// date-time, then a bare date at midnight. Naive values are taken as UTC.
fn parse_with(items: &OwnedFormatItem, text: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(text, items)
        .ok()
        .or_else(|| {
            PrimitiveDateTime::parse(text, items)
                .ok()
                .map(PrimitiveDateTime::assume_utc)
        })
        .or_else(|| {
            Date::parse(text, items)
                .ok()
                .map(|d| d.midnight().assume_utc())
        })
}

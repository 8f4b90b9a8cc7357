//! Daily date keys for a crawl window.

use crate::error::{AppError, Result};
use chrono::{Days, NaiveDate};
use std::iter::FusedIterator;

/// Format the content API expects for its `date` parameter.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// An inclusive, validated `[start, end]` range of calendar days.
///
/// The range itself is `Copy`; every call to [`DateRange::iter`] starts a fresh
/// sequence, so the same range can be walked any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Parse `YYYY-MM-DD` strings (single-digit month and day are accepted).
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidRange`] if either string is not a calendar date or
    /// `start` falls after `end`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AppError::invalid_range(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both ends included.
    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn iter(&self) -> DateKeys {
        DateKeys {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for &DateRange {
    type Item = String;
    type IntoIter = DateKeys;

    fn into_iter(self) -> DateKeys {
        self.iter()
    }
}

/// Lazy ascending sequence of `YYYY-MM-DD` keys.
#[derive(Debug, Clone)]
pub struct DateKeys {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateKeys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let current = self.next?;
        self.next = if current < self.end {
            current.checked_add_days(Days::new(1))
        } else {
            None
        };
        Some(current.format(DATE_KEY_FORMAT).to_string())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self
            .next
            .map(|d| (self.end - d).num_days() as usize + 1)
            .unwrap_or(0);
        (n, Some(n))
    }
}

impl ExactSizeIterator for DateKeys {}
impl FusedIterator for DateKeys {}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
        .map_err(|e| AppError::invalid_range(format!("'{s}' is not a YYYY-MM-DD date: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_range_count_and_order() {
        let range = DateRange::parse("2016-02-27", "2016-03-02").unwrap();
        let keys: Vec<String> = range.iter().collect();
        assert_eq!(
            keys,
            vec![
                "2016-02-27",
                "2016-02-28",
                "2016-02-29",
                "2016-03-01",
                "2016-03-02"
            ]
        );
        assert_eq!(range.num_days(), keys.len());
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::parse("2017-06-01", "2017-06-01").unwrap();
        assert_eq!(range.iter().collect::<Vec<_>>(), vec!["2017-06-01"]);
    }

    #[test]
    fn test_unpadded_month_is_accepted() {
        let range = DateRange::parse("2017-1-30", "2017-2-01").unwrap();
        let keys: Vec<String> = range.iter().collect();
        assert_eq!(keys, vec!["2017-01-30", "2017-01-31", "2017-02-01"]);
    }

    #[test]
    fn test_sequence_is_restartable() {
        let range = DateRange::parse("2020-12-30", "2021-01-02").unwrap();
        let first: Vec<String> = range.iter().collect();
        let second: Vec<String> = (&range).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let range = DateRange::parse("2020-01-01", "2020-01-10").unwrap();
        let mut keys = range.iter();
        assert_eq!(keys.len(), 10);
        keys.next();
        keys.next();
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = DateRange::parse("2020-01-05", "2020-01-01").unwrap_err();
        assert!(matches!(err, AppError::InvalidRange { .. }));
    }

    #[test]
    fn test_malformed_dates_are_rejected() {
        assert!(DateRange::parse("2020-13-01", "2020-12-31").is_err());
        assert!(DateRange::parse("2020-02-30", "2020-03-01").is_err());
        assert!(DateRange::parse("yesterday", "2020-03-01").is_err());
        assert!(DateRange::parse("2020-03-01", "").is_err());
    }
}

//! `YYYYMMDD` trade dates.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PrimitiveError;

const FORMAT: &str = "%Y%m%d";

/// A trade date as carried in the weekly tables (`YYYYMMDD`).
///
/// Ordering matches the ordering of the string form, so filters written
/// against the raw column and against this type agree. The default is the
/// Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(NaiveDate);

impl TradeDate {
    /// Wrap a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year, month and day.
    ///
    /// # Errors
    /// Returns `PrimitiveError::InvalidDate` for an impossible calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, PrimitiveError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| PrimitiveError::InvalidDate(format!("{year:04}{month:02}{day:02}")))
    }

    /// Parse a `YYYYMMDD` string.
    ///
    /// # Errors
    /// Returns `PrimitiveError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> Result<Self, PrimitiveError> {
        let s = s.trim();
        if s.len() != 8 {
            return Err(PrimitiveError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, FORMAT)
            .map(Self)
            .map_err(|_| PrimitiveError::InvalidDate(s.to_string()))
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Date `weeks` weeks earlier.
    #[must_use]
    pub fn weeks_before(&self, weeks: u32) -> Self {
        Self(self.0 - Duration::weeks(i64::from(weeks)))
    }

    /// Date `years` years later; Feb 29 rolls back to Feb 28.
    #[must_use]
    pub fn years_after(&self, years: u32) -> Self {
        Self(self.0.checked_add_months(Months::new(years * 12)).unwrap_or(NaiveDate::MAX))
    }

    /// `YYYYMMDD` representation.
    #[must_use]
    pub fn to_compact(&self) -> String {
        self.0.format(FORMAT).to_string()
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for TradeDate {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for TradeDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for TradeDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_compact())
    }
}

impl<'de> Deserialize<'de> for TradeDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let date = TradeDate::parse("20190104").unwrap();
        assert_eq!(date.to_string(), "20190104");
        assert_eq!(date.year(), 2019);
    }

    #[rstest]
    #[case("2019-01-04")]
    #[case("20191301")]
    #[case("201901")]
    #[case("")]
    fn parse_rejects_malformed(#[case] s: &str) {
        assert!(TradeDate::parse(s).is_err());
    }

    #[test]
    fn ordering_matches_string_ordering() {
        let a = TradeDate::parse("20181228").unwrap();
        let b = TradeDate::parse("20190104").unwrap();
        assert!(a < b);
        assert!(a.to_compact() < b.to_compact());
    }

    #[test]
    fn weeks_before_shifts_by_seven_days() {
        let date = TradeDate::parse("20190111").unwrap();
        assert_eq!(date.weeks_before(1).to_compact(), "20190104");
        assert_eq!(date.weeks_before(50).to_compact(), "20180126");
    }

    #[test]
    fn years_after_handles_leap_day() {
        let date = TradeDate::parse("20200229").unwrap();
        assert_eq!(date.years_after(1).to_compact(), "20210228");
        assert_eq!(TradeDate::parse("20100315").unwrap().years_after(1).to_compact(), "20110315");
    }
}

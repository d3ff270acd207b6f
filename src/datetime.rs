//! Normalized date and time values.
//!
//! The four TOML date/time flavors (local date, local time, local date-time,
//! offset date-time) all become one [`DateTime`] record with explicit fields.
//! Fields a flavor does not carry are zero, and `offset` is present only for
//! offset date-times, so consumers can branch on [`DateTime::has_offset`]
//! instead of on four node kinds. [`DateTime::kind`] remembers the flavor so
//! the value re-encodes to the same TOML literal.
//!
//! ## Examples
//!
//! ```rust
//! use tomlutil::{from_str, DateTimeKind};
//!
//! let map = from_str("when = 1979-05-27T07:32:00.999-07:00").unwrap();
//! let when = map.get("when").and_then(|v| v.as_datetime()).unwrap();
//!
//! assert_eq!(when.kind, DateTimeKind::OffsetDateTime);
//! assert_eq!((when.year, when.month, when.day), (1979, 5, 27));
//! assert_eq!(when.nanosecond, 999_000_000);
//! assert_eq!(when.offset, Some(-420));
//! assert_eq!(when.to_string(), "1979-05-27T07:32:00.999-07:00");
//! ```

use crate::document::{self, write_fraction, write_offset};
use crate::{Error, Result};
use chrono::{
    DateTime as ChronoDateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime,
    Timelike,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Newtype name a [`DateTime`] serializes under. [`crate::to_value`]
/// recognizes it and keeps the value a date-time; other serializers see a
/// plain RFC 3339 string.
pub(crate) const NEWTYPE_NAME: &str = "$__tomlutil_private_datetime";

/// Which TOML date/time literal a [`DateTime`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetDateTime,
}

impl DateTimeKind {
    #[must_use]
    pub const fn has_date(self) -> bool {
        !matches!(self, DateTimeKind::LocalTime)
    }

    #[must_use]
    pub const fn has_time(self) -> bool {
        !matches!(self, DateTimeKind::LocalDate)
    }
}

/// A calendar/time record with every component spelled out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateTime {
    pub kind: DateTimeKind,
    pub year: u16,
    /// One-based month.
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    /// UTC offset in minutes, only for [`DateTimeKind::OffsetDateTime`].
    pub offset: Option<i16>,
}

impl DateTime {
    fn zeroed(kind: DateTimeKind) -> Self {
        DateTime {
            kind,
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
            nanosecond: 0,
            offset: None,
        }
    }

    #[must_use]
    pub fn local_date(year: u16, month: u8, day: u8) -> Self {
        DateTime {
            year,
            month,
            day,
            ..Self::zeroed(DateTimeKind::LocalDate)
        }
    }

    #[must_use]
    pub fn local_time(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Self {
        DateTime {
            hour,
            minute,
            second,
            nanosecond,
            ..Self::zeroed(DateTimeKind::LocalTime)
        }
    }

    #[must_use]
    pub fn local_datetime(date: Self, time: Self) -> Self {
        DateTime {
            kind: DateTimeKind::LocalDateTime,
            year: date.year,
            month: date.month,
            day: date.day,
            hour: time.hour,
            minute: time.minute,
            second: time.second,
            nanosecond: time.nanosecond,
            offset: None,
        }
    }

    #[must_use]
    pub fn offset_datetime(date: Self, time: Self, offset_minutes: i16) -> Self {
        DateTime {
            kind: DateTimeKind::OffsetDateTime,
            offset: Some(offset_minutes),
            ..Self::local_datetime(date, time)
        }
    }

    #[inline]
    #[must_use]
    pub const fn has_offset(&self) -> bool {
        self.offset.is_some()
    }

    /// Checks every component against its TOML range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] naming the first component out of range.
    pub fn validate(&self) -> Result<()> {
        if self.kind.has_date() {
            check("year", u32::from(self.year), 0, 9999)?;
            check("month", u32::from(self.month), 1, 12)?;
            check("day", u32::from(self.day), 1, 31)?;
            if self.to_naive_date().is_none() {
                return Err(Error::encode(format!(
                    "day {} does not exist in {:04}-{:02}",
                    self.day, self.year, self.month
                )));
            }
        }
        if self.kind.has_time() {
            check("hour", u32::from(self.hour), 0, 23)?;
            check("minute", u32::from(self.minute), 0, 59)?;
            // Leap seconds are legal in RFC 3339.
            check("second", u32::from(self.second), 0, 60)?;
            check("nanosecond", self.nanosecond, 0, 999_999_999)?;
        }
        if let Some(offset) = self.offset {
            if offset.unsigned_abs() >= 24 * 60 {
                return Err(Error::encode(format!(
                    "UTC offset of {} minutes is out of range",
                    offset
                )));
            }
        }
        Ok(())
    }

    /// The date part as a chrono date, if this value has one and it exists
    /// on the calendar.
    #[must_use]
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        if !self.kind.has_date() {
            return None;
        }
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
    }

    #[must_use]
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        if !self.kind.has_time() {
            return None;
        }
        NaiveTime::from_hms_nano_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
            self.nanosecond,
        )
    }

    #[must_use]
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::new(
            self.to_naive_date()?,
            self.to_naive_time()?,
        ))
    }

    /// Converts an offset date-time into a chrono timestamp.
    #[must_use]
    pub fn to_fixed_offset(&self) -> Option<ChronoDateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(i32::from(self.offset?) * 60)?;
        self.to_naive_datetime()?
            .and_local_timezone(offset)
            .single()
    }
}

impl DateTime {
    pub(crate) fn from_toml(dt: &toml_edit::Datetime) -> Option<Self> {
        let date = dt.date.map(|d| DateTime::local_date(d.year, d.month, d.day));
        let time = dt
            .time
            .map(|t| DateTime::local_time(t.hour, t.minute, t.second, t.nanosecond));
        match (date, time, dt.offset) {
            (Some(date), Some(time), Some(offset)) => {
                let minutes = match offset {
                    toml_edit::Offset::Z => 0,
                    toml_edit::Offset::Custom { minutes } => minutes,
                };
                Some(DateTime::offset_datetime(date, time, minutes))
            }
            (Some(date), Some(time), None) => Some(DateTime::local_datetime(date, time)),
            (Some(date), None, None) => Some(date),
            (None, Some(time), None) => Some(time),
            _ => None,
        }
    }

    /// Re-encodes into the `toml_edit` literal of the same flavor.
    pub(crate) fn to_toml(&self) -> Result<toml_edit::Datetime> {
        self.validate()?;
        Ok(self.to_toml_unchecked())
    }

    pub(crate) fn to_toml_unchecked(&self) -> toml_edit::Datetime {
        let date = self.kind.has_date().then_some(toml_edit::Date {
            year: self.year,
            month: self.month,
            day: self.day,
        });
        let time = self.kind.has_time().then_some(toml_edit::Time {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            nanosecond: self.nanosecond,
        });
        let offset = match (self.kind, self.offset) {
            (DateTimeKind::OffsetDateTime, Some(0) | None) => Some(toml_edit::Offset::Z),
            (DateTimeKind::OffsetDateTime, Some(minutes)) => {
                Some(toml_edit::Offset::Custom { minutes })
            }
            _ => None,
        };
        toml_edit::Datetime { date, time, offset }
    }
}

fn check(component: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(Error::encode(format!(
            "{} {} is out of range {}..={}",
            component, value, min, max
        )));
    }
    Ok(())
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.has_date() {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        }
        if self.kind.has_date() && self.kind.has_time() {
            f.write_str("T")?;
        }
        if self.kind.has_time() {
            write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
            write_fraction(f, self.nanosecond)?;
        }
        if let Some(offset) = self.offset {
            write_offset(f, offset)?;
        }
        Ok(())
    }
}

impl FromStr for DateTime {
    type Err = Error;

    /// Parses any of the four TOML date/time literals.
    fn from_str(s: &str) -> Result<Self> {
        let dt = toml_edit::Datetime::from_str(s)
            .map_err(|err| Error::custom(format!("invalid date-time `{}`: {}", s, err)))?;
        DateTime::from_toml(&dt)
            .ok_or_else(|| Error::custom(format!("invalid date-time `{}`", s)))
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(NEWTYPE_NAME, &self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DateTimeVisitor;

        impl<'de> de::Visitor<'de> for DateTimeVisitor {
            type Value = DateTime;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a TOML date-time string")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<DateTime, E>
            where
                E: de::Error,
            {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DateTimeVisitor)
    }
}

impl From<&document::LocalDate> for DateTime {
    fn from(date: &document::LocalDate) -> Self {
        DateTime::local_date(date.year, date.month.saturating_add(1), date.day)
    }
}

impl From<&document::LocalTime> for DateTime {
    fn from(time: &document::LocalTime) -> Self {
        DateTime::local_time(time.hour, time.minute, time.second, time.total_nanos())
    }
}

impl From<&document::LocalDateTime> for DateTime {
    fn from(dt: &document::LocalDateTime) -> Self {
        DateTime::local_datetime((&dt.date).into(), (&dt.time).into())
    }
}

impl From<&document::OffsetDateTime> for DateTime {
    fn from(dt: &document::OffsetDateTime) -> Self {
        DateTime::offset_datetime((&dt.date).into(), (&dt.time).into(), dt.offset_minutes)
    }
}

impl TryFrom<NaiveDate> for DateTime {
    type Error = Error;

    /// Fails for years outside `0..=9999`, which TOML cannot write.
    fn try_from(date: NaiveDate) -> Result<Self> {
        let year = u16::try_from(date.year())
            .ok()
            .filter(|year| *year <= 9999)
            .ok_or_else(|| Error::encode(format!("year {} is out of range 0..=9999", date.year())))?;
        Ok(DateTime::local_date(year, date.month() as u8, date.day() as u8))
    }
}

/// A chrono leap second becomes second 60.
impl From<NaiveTime> for DateTime {
    fn from(time: NaiveTime) -> Self {
        let (second, nanosecond) = match time.nanosecond().checked_sub(1_000_000_000) {
            Some(nanos) => (time.second() + 1, nanos),
            None => (time.second(), time.nanosecond()),
        };
        DateTime::local_time(
            time.hour() as u8,
            time.minute() as u8,
            second as u8,
            nanosecond,
        )
    }
}

impl TryFrom<NaiveDateTime> for DateTime {
    type Error = Error;

    fn try_from(dt: NaiveDateTime) -> Result<Self> {
        Ok(DateTime::local_datetime(
            dt.date().try_into()?,
            dt.time().into(),
        ))
    }
}

impl TryFrom<ChronoDateTime<FixedOffset>> for DateTime {
    type Error = Error;

    fn try_from(dt: ChronoDateTime<FixedOffset>) -> Result<Self> {
        let local = dt.naive_local();
        let offset = (dt.offset().local_minus_utc() / 60) as i16;
        Ok(DateTime::offset_datetime(
            local.date().try_into()?,
            local.time().into(),
            offset,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_time_nanoseconds_are_summed() {
        let time = document::LocalTime {
            hour: 1,
            minute: 2,
            second: 3,
            millisecond: 1,
            microsecond: 2,
            nanosecond: 3,
        };
        let dt = DateTime::from(&time);
        assert_eq!(dt.nanosecond, 1_002_003);
        assert_eq!(dt.kind, DateTimeKind::LocalTime);
        assert_eq!((dt.year, dt.month, dt.day), (0, 0, 0));
        assert!(!dt.has_offset());
    }

    #[test]
    fn test_month_becomes_one_based() {
        let date = document::LocalDate {
            year: 2024,
            month: 0,
            day: 15,
        };
        let dt = DateTime::from(&date);
        assert_eq!(dt.month, 1);
        assert_eq!((dt.hour, dt.minute, dt.second, dt.nanosecond), (0, 0, 0, 0));
    }

    #[test]
    fn test_offset_only_on_offset_datetime() {
        let date = document::LocalDate {
            year: 2024,
            month: 11,
            day: 31,
        };
        let time = document::LocalTime::with_nanos(23, 59, 59, 0);
        let local = DateTime::from(&document::LocalDateTime { date, time });
        assert_eq!(local.offset, None);

        let offset = DateTime::from(&document::OffsetDateTime {
            date,
            time,
            offset_minutes: 330,
        });
        assert_eq!(offset.offset, Some(330));
        assert_eq!(offset.to_string(), "2024-12-31T23:59:59+05:30");
    }

    #[test]
    fn test_validate_ranges() {
        assert!(DateTime::local_date(2024, 2, 29).validate().is_ok());
        assert!(DateTime::local_date(2024, 13, 1).validate().is_err());
        assert!(DateTime::local_date(2024, 0, 1).validate().is_err());
        assert!(DateTime::local_date(2023, 2, 28).validate().is_ok());
        assert!(DateTime::local_date(2023, 2, 29).validate().is_err());
        assert!(DateTime::local_date(2023, 2, 30).validate().is_err());
        assert!(DateTime::local_date(2023, 4, 31).validate().is_err());
        assert!(DateTime::local_date(0, 1, 1).validate().is_ok());
        assert!(DateTime::local_date(9999, 12, 31).validate().is_ok());
        assert!(DateTime::local_date(10000, 1, 1).validate().is_err());
        assert!(DateTime::local_time(24, 0, 0, 0).validate().is_err());
        assert!(DateTime::local_time(23, 59, 60, 0).validate().is_ok());
        assert!(DateTime::local_time(0, 0, 0, 1_000_000_000)
            .validate()
            .is_err());

        let date = DateTime::local_date(2024, 1, 1);
        let time = DateTime::local_time(0, 0, 0, 0);
        assert!(DateTime::offset_datetime(date, time, 1439).validate().is_ok());
        assert!(DateTime::offset_datetime(date, time, -1440)
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_str_keeps_flavor() {
        let dt: DateTime = "1979-05-27T07:32:00.000001".parse().unwrap();
        assert_eq!(dt.kind, DateTimeKind::LocalDateTime);
        assert_eq!(dt.nanosecond, 1_000);

        let time: DateTime = "07:32:00".parse().unwrap();
        assert_eq!(time, DateTime::local_time(7, 32, 0, 0));

        assert!("not a date".parse::<DateTime>().is_err());
    }

    #[test]
    fn test_to_toml_rejects_out_of_range() {
        let bad = DateTime::local_date(2024, 0, 1);
        assert!(bad.to_toml().is_err());

        let date = DateTime::local_date(1979, 5, 27);
        let time = DateTime::local_time(0, 32, 0, 0);
        let utc = DateTime::offset_datetime(date, time, 0).to_toml().unwrap();
        assert_eq!(utc.to_string(), "1979-05-27T00:32:00Z");
    }

    #[test]
    fn test_chrono_roundtrip() {
        let chrono_dt = ChronoDateTime::parse_from_rfc3339("1979-05-27T00:32:00.5-07:00").unwrap();
        let dt = DateTime::try_from(chrono_dt).unwrap();
        assert_eq!(dt.offset, Some(-420));
        assert_eq!(dt.nanosecond, 500_000_000);
        assert_eq!(dt.to_fixed_offset(), Some(chrono_dt));

        let time = DateTime::local_time(12, 0, 0, 0);
        assert!(time.to_naive_date().is_none());
        assert!(time.to_fixed_offset().is_none());
        assert_eq!(time.to_naive_time(), NaiveTime::from_hms_opt(12, 0, 0));
    }

    #[test]
    fn test_chrono_years_outside_toml_range() {
        let far = NaiveDate::from_ymd_opt(12_000, 1, 1).unwrap();
        let err = DateTime::try_from(far).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Encode);

        let bce = NaiveDate::from_ymd_opt(-1, 1, 1).unwrap();
        assert!(DateTime::try_from(bce.and_hms_opt(0, 0, 0).unwrap()).is_err());

        let edge = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert_eq!(
            DateTime::try_from(edge).unwrap(),
            DateTime::local_date(9999, 12, 31)
        );
    }

    #[test]
    fn test_chrono_leap_second() {
        let leap = NaiveTime::from_hms_nano_opt(23, 59, 59, 1_500_000_000).unwrap();
        assert_eq!(
            DateTime::from(leap),
            DateTime::local_time(23, 59, 60, 500_000_000)
        );
    }
}

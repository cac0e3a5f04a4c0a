// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Date and date-time values (RFC 5545 Section 3.3.4 and 3.3.5, RFC 6350 Section 4.3).

use std::fmt;

use jiff::{Timestamp, Zoned};
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

use crate::keyword::{KW_TZID, KW_VALUE, KW_VALUE_DATE};
use crate::property::Property;

/// Parse a date in basic (`YYYYMMDD`) or extended (`YYYY-MM-DD`) form.
///
/// A trailing time part after `T` is ignored, so vCard `BDAY:19700101T000000Z` is accepted.
#[must_use]
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    let date_part = text.split_once('T').map_or(text, |(date, _)| date);
    let digits: String = date_part.chars().filter(|c| *c != '-').collect();
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = digits.get(0..4)?.parse().ok()?;
    let month = digits.get(4..6)?.parse().ok()?;
    let day = digits.get(6..8)?.parse().ok()?;
    Date::new(year, month, day).ok()
}

/// Parse a time in basic (`HHMMSS`) or extended (`HH:MM:SS`) form, without zone suffix.
///
/// A leap second is clamped to 59.
#[must_use]
pub fn parse_time(text: &str) -> Option<Time> {
    let digits: String = text.trim().chars().filter(|c| *c != ':').collect();
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hour = digits.get(0..2)?.parse().ok()?;
    let minute = digits.get(2..4)?.parse().ok()?;
    let second: i8 = digits.get(4..6)?.parse().ok()?;
    Time::new(hour, minute, second.min(59), 0).ok()
}

/// A `DATE` or `DATE-TIME` value with its zone form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalDateTime {
    /// Date only, `VALUE=DATE`
    Date(Date),

    /// Date and time without zone (floating time)
    Floating(DateTime),

    /// Date and time in UTC, trailing `Z`
    Utc(DateTime),

    /// Date and time in a named zone, `TZID=...`
    Zoned {
        /// Timezone identifier as written
        tz_id: String,
        /// Wall clock time in that zone
        datetime: DateTime,
    },
}

impl CalDateTime {
    /// The current time in UTC, truncated to whole seconds.
    #[must_use]
    pub fn now_utc() -> Self {
        let now = Timestamp::now().to_zoned(TimeZone::UTC).datetime();
        Self::Utc(now.with().subsec_nanosecond(0).build().unwrap_or(now))
    }

    /// Parse value text, with the `TZID` parameter if any.
    #[must_use]
    pub fn parse(text: &str, tz_id: Option<&str>) -> Option<Self> {
        let text = text.trim();
        let Some((date, time)) = text.split_once('T') else {
            return parse_date(text).map(Self::Date);
        };

        let date = parse_date(date)?;
        let (time, utc) = match time.strip_suffix('Z') {
            Some(time) => (time, true),
            None => (time, false),
        };
        let datetime = DateTime::from_parts(date, parse_time(time)?);
        Some(match (utc, tz_id) {
            (true, _) => Self::Utc(datetime),
            (false, Some(tz_id)) => Self::Zoned {
                tz_id: tz_id.to_owned(),
                datetime,
            },
            (false, None) => Self::Floating(datetime),
        })
    }

    /// Parse the value of a property, honoring `TZID` and `VALUE=DATE`.
    #[must_use]
    pub fn from_property(property: &Property) -> Option<Self> {
        let text = property.text()?;
        let value = Self::parse(text, property.parameters.get(KW_TZID))?;
        let date_only = property
            .parameters
            .get(KW_VALUE)
            .is_some_and(|v| v.eq_ignore_ascii_case(KW_VALUE_DATE));
        Some(match value {
            Self::Floating(dt) | Self::Utc(dt) | Self::Zoned { datetime: dt, .. } if date_only => {
                Self::Date(dt.date())
            }
            value => value,
        })
    }

    /// Build a property carrying this value, with `VALUE=DATE` or `TZID` as needed.
    #[must_use]
    pub fn to_property(&self, name: &str) -> Property {
        let property = Property::new(name, self.to_string());
        match self {
            Self::Date(_) => property.with_parameter(KW_VALUE, KW_VALUE_DATE),
            Self::Zoned { tz_id, .. } => property.with_parameter(KW_TZID, tz_id.as_str()),
            Self::Floating(_) | Self::Utc(_) => property,
        }
    }

    /// The calendar date.
    #[must_use]
    pub fn date(&self) -> Date {
        match self {
            Self::Date(date) => *date,
            Self::Floating(dt) | Self::Utc(dt) | Self::Zoned { datetime: dt, .. } => dt.date(),
        }
    }

    /// Whether this is a date without time.
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Resolve to an instant; dates and floating times are placed in `local`.
    ///
    /// Unknown zone identifiers fall back to `local` as well.
    #[must_use]
    pub fn to_zoned(&self, local: &TimeZone) -> Option<Zoned> {
        match self {
            Self::Date(date) => DateTime::from_parts(*date, Time::midnight())
                .to_zoned(local.clone())
                .ok(),
            Self::Floating(dt) => dt.to_zoned(local.clone()).ok(),
            Self::Utc(dt) => dt.to_zoned(TimeZone::UTC).ok(),
            Self::Zoned { tz_id, datetime } => {
                let tz = TimeZone::get(tz_id).unwrap_or_else(|_| local.clone());
                datetime.to_zoned(tz).ok()
            }
        }
    }
}

impl fmt::Display for CalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.strftime("%Y%m%d")),
            Self::Floating(dt) | Self::Zoned { datetime: dt, .. } => {
                write!(f, "{}", dt.strftime("%Y%m%dT%H%M%S"))
            }
            Self::Utc(dt) => write!(f, "{}", dt.strftime("%Y%m%dT%H%M%SZ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, datetime};

    use super::*;

    #[test]
    fn parses_both_date_forms() {
        assert_eq!(parse_date("2004-06-19"), Some(date(2004, 6, 19)));
        assert_eq!(parse_date("20040619"), Some(date(2004, 6, 19)));
        assert_eq!(parse_date("19700101T000000Z"), Some(date(1970, 1, 1)));
        assert_eq!(parse_date("2004-02-30"), None);
        assert_eq!(parse_date("--0619"), None);
    }

    #[test]
    fn parses_zone_forms() {
        let dt = datetime(2025, 3, 1, 9, 30, 0, 0);
        assert_eq!(
            CalDateTime::parse("20250301T093000Z", None),
            Some(CalDateTime::Utc(dt))
        );
        assert_eq!(
            CalDateTime::parse("20250301T093000", None),
            Some(CalDateTime::Floating(dt))
        );
        assert_eq!(
            CalDateTime::parse("20250301T093000", Some("Europe/Berlin")),
            Some(CalDateTime::Zoned {
                tz_id: "Europe/Berlin".into(),
                datetime: dt
            })
        );
        assert_eq!(
            CalDateTime::parse("20250301", None),
            Some(CalDateTime::Date(date(2025, 3, 1)))
        );
    }

    #[test]
    fn property_round_trip() {
        let value = CalDateTime::Zoned {
            tz_id: "America/New_York".into(),
            datetime: datetime(2025, 12, 24, 18, 0, 0, 0),
        };
        let property = value.to_property("DTSTART");
        assert_eq!(property.text(), Some("20251224T180000"));
        assert_eq!(property.parameters.get("TZID"), Some("America/New_York"));
        assert_eq!(CalDateTime::from_property(&property), Some(value));

        let day = CalDateTime::Date(date(2025, 12, 25));
        let property = day.to_property("DTSTART");
        assert_eq!(property.parameters.get("VALUE"), Some("DATE"));
        assert_eq!(CalDateTime::from_property(&property), Some(day));
    }

    #[test]
    fn utc_resolves_to_instant() {
        let value = CalDateTime::Utc(datetime(2025, 1, 1, 0, 0, 0, 0));
        let zoned = value.to_zoned(&TimeZone::fixed(jiff::tz::offset(8))).unwrap();
        assert_eq!(zoned.timestamp().as_second(), 1_735_689_600);
    }
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, ValueHint, arg, value_parser};
use davsync_dav::{Href, TimeRange};
use jiff::{Timestamp, civil::Date, tz::TimeZone};

pub fn arg_verbose() -> Arg {
    arg!(-v --verbose "Show more detailed information")
}

pub fn get_verbose(matches: &ArgMatches) -> bool {
    matches.get_flag("verbose")
}

pub fn arg_collection(required: bool) -> Arg {
    let arg = if required {
        arg!(collection: <COLLECTION> "Href of the collection")
    } else {
        arg!(collection: [COLLECTION] "Href of the collection, all collections when omitted")
    };
    arg.value_hint(ValueHint::Url)
}

pub fn get_collection(matches: &ArgMatches) -> Option<Href> {
    matches
        .get_one::<String>("collection")
        .map(|a| Href::from(a.as_str()))
}

pub fn arg_start() -> Arg {
    arg!(--start <START> "Only items at or after this time, YYYY-MM-DD or RFC 3339")
        .value_parser(parse_instant)
}

pub fn arg_end() -> Arg {
    arg!(--end <END> "Only items before this time, YYYY-MM-DD or RFC 3339")
        .value_parser(parse_instant)
}

/// The time range from `--start` and `--end`; an end without a start starts at the epoch.
pub fn get_time_range(matches: &ArgMatches) -> Option<TimeRange> {
    let start = matches.get_one::<Timestamp>("start").copied();
    let end = matches.get_one::<Timestamp>("end").copied();
    match (start, end) {
        (Some(start), Some(end)) => Some(TimeRange::between(start, end)),
        (Some(start), None) => Some(TimeRange::starting(start)),
        (None, Some(end)) => Some(TimeRange::between(Timestamp::UNIX_EPOCH, end)),
        (None, None) => None,
    }
}

pub fn arg_limit() -> Arg {
    arg!(--limit <N> "Maximum number of items to show")
        .value_parser(value_parser!(usize))
}

pub fn get_limit(matches: &ArgMatches) -> Option<usize> {
    matches.get_one("limit").copied()
}

/// Parse an RFC 3339 instant, or a date taken as midnight UTC.
pub fn parse_instant(s: &str) -> Result<Timestamp, String> {
    if let Ok(timestamp) = s.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    s.parse::<Date>()
        .map_err(|e| format!("Invalid time '{s}': {e}"))
        .and_then(|date| {
            date.to_zoned(TimeZone::UTC)
                .map(|zoned| zoned.timestamp())
                .map_err(|e| e.to_string())
        })
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Backslash escaping of text values (RFC 6350 Section 3.4, RFC 5545 Section 3.3.11).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::keyword::{
    KW_ADR, KW_ATTACH, KW_BDAY, KW_CATEGORIES, KW_CLIENTPIDMAP, KW_COMPLETED, KW_CREATED,
    KW_DTEND, KW_DTSTAMP, KW_DTSTART, KW_DUE, KW_DURATION, KW_EXDATE, KW_EXRULE, KW_FREEBUSY,
    KW_GEO, KW_KEY, KW_LAST_MODIFIED, KW_LOGO, KW_N, KW_NICKNAME, KW_ORG, KW_PHOTO, KW_RDATE,
    KW_RECURRENCE_ID, KW_REQUEST_STATUS, KW_RESOURCES, KW_REV, KW_RRULE, KW_SOUND, KW_TRIGGER,
    KW_TZOFFSETFROM, KW_TZOFFSETTO, KW_X_ABDATE,
};
use crate::property::PropertyValue;

/// How the value text of a property is split and escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Single escaped text value
    Text,
    /// Fields separated by literal `;`, each escaped
    Structured,
    /// Items separated by literal `,`, each escaped
    List,
    /// Taken verbatim: dates, durations, recurrence rules, URIs
    Raw,
}

impl ValueKind {
    /// The kind of value a property carries, by property name.
    #[must_use]
    pub fn of(name: &str) -> Self {
        const STRUCTURED: &[&str] = &[KW_ADR, KW_N, KW_ORG, KW_CLIENTPIDMAP];
        const LIST: &[&str] = &[KW_CATEGORIES, KW_NICKNAME, KW_RESOURCES];
        const RAW: &[&str] = &[
            KW_RRULE,
            KW_EXRULE,
            KW_RDATE,
            KW_EXDATE,
            KW_GEO,
            KW_REQUEST_STATUS,
            KW_FREEBUSY,
            KW_DTSTART,
            KW_DTEND,
            KW_DUE,
            KW_DTSTAMP,
            KW_CREATED,
            KW_LAST_MODIFIED,
            KW_COMPLETED,
            KW_RECURRENCE_ID,
            KW_TRIGGER,
            KW_DURATION,
            KW_TZOFFSETFROM,
            KW_TZOFFSETTO,
            KW_BDAY,
            KW_REV,
            KW_X_ABDATE,
            KW_PHOTO,
            KW_LOGO,
            KW_SOUND,
            KW_KEY,
            KW_ATTACH,
        ];

        let matches = |list: &[&str]| list.iter().any(|k| k.eq_ignore_ascii_case(name));
        if matches(STRUCTURED) {
            Self::Structured
        } else if matches(LIST) {
            Self::List
        } else if matches(RAW) {
            Self::Raw
        } else {
            Self::Text
        }
    }

    /// Split and unescape value text.
    #[must_use]
    pub fn parse(self, raw: &str) -> PropertyValue {
        match self {
            Self::Text => PropertyValue::Text(unescape(raw)),
            Self::Structured => PropertyValue::Structured(
                split_unescaped(raw, ';').into_iter().map(unescape).collect(),
            ),
            Self::List => PropertyValue::List(
                split_unescaped(raw, ',').into_iter().map(unescape).collect(),
            ),
            Self::Raw => PropertyValue::Text(raw.to_owned()),
        }
    }

    /// Escape and join a value into value text.
    #[must_use]
    pub fn format(self, value: &PropertyValue) -> String {
        let escaped = self != Self::Raw;
        let join = |parts: &[String], sep: &str| {
            parts
                .iter()
                .map(|p| if escaped { escape(p) } else { p.clone() })
                .collect::<Vec<_>>()
                .join(sep)
        };

        match value {
            PropertyValue::Text(text) if escaped => escape(text),
            PropertyValue::Text(text) => text.clone(),
            PropertyValue::Structured(parts) => join(parts, ";"),
            PropertyValue::List(parts) => join(parts, ","),
            PropertyValue::Binary(bytes) => STANDARD.encode(bytes),
        }
    }
}

/// Escape backslash, semicolon, comma and newlines.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            c => out.push(c),
        }
    }
    out
}

/// Resolve backslash escapes; unknown escapes keep the escaped character.
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Split at separators that are not escaped by a backslash; parts stay escaped.
#[must_use]
pub fn split_unescaped(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(text.get(start..i).unwrap_or_default());
            start = i + c.len_utf8();
        }
    }
    parts.push(text.get(start..).unwrap_or_default());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape("a,b;c\\d\ne"), r"a\,b\;c\\d\ne");
        assert_eq!(escape("line\r\nbreak"), r"line\nbreak");
        assert_eq!(unescape(r"a\,b\;c\\d\ne\Nf"), "a,b;c\\d\ne\nf");
    }

    #[test]
    fn unescape_is_lenient() {
        assert_eq!(unescape(r"http\://x"), "http://x");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn splits_on_unescaped_separators_only() {
        assert_eq!(split_unescaped(r"a\;b;c;;", ';'), [r"a\;b", "c", "", ""]);
        assert_eq!(split_unescaped(r"a\\;b", ';'), [r"a\\", "b"]);
    }

    #[test]
    fn structured_values_keep_literal_separators() {
        let value = ValueKind::of("adr").parse(r";;1 Main St\, Apt 2;Springfield;IL;62701;USA");
        assert_eq!(value.part(2), "1 Main St, Apt 2");
        assert_eq!(value.part(6), "USA");
        assert_eq!(
            ValueKind::Structured.format(&value),
            r";;1 Main St\, Apt 2;Springfield;IL;62701;USA"
        );
    }

    #[test]
    fn raw_values_are_not_escaped() {
        assert_eq!(ValueKind::of("RRULE"), ValueKind::Raw);
        let value = ValueKind::Raw.parse("FREQ=WEEKLY;BYDAY=MO,WE");
        assert_eq!(value, PropertyValue::Text("FREQ=WEEKLY;BYDAY=MO,WE".into()));
        assert_eq!(ValueKind::Raw.format(&value), "FREQ=WEEKLY;BYDAY=MO,WE");
    }

    #[test]
    fn list_values_split_on_commas() {
        let value = ValueKind::of("CATEGORIES").parse(r"Work,Travel\, abroad");
        assert_eq!(
            value,
            PropertyValue::List(vec!["Work".into(), "Travel, abroad".into()])
        );
    }
}

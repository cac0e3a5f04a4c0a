// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Line codec: content lines to properties and back.
//!
//! Decoding runs `unfold → parse_line → decode_property`:
//!
//! 1. Unfold continuation lines (and quoted-printable soft breaks)
//! 2. Split the head (`group.NAME;PARAM=VALUE`) from the value at the first unquoted colon
//! 3. Undo the `ENCODING` transform, reinterpret through `CHARSET`, then unescape
//!
//! Encoding is the inverse, ending with [`fold`].

mod escape;
mod fold;
mod lexer;
mod transfer;

use logos::Logos;

pub use crate::line::escape::{ValueKind, escape, split_unescaped, unescape};
pub use crate::line::fold::{FOLD, LogicalLine, fold, unfold};
pub use crate::line::transfer::{Encoding, decode_charset, encode_charset};

use crate::error::ParseWarning;
use crate::keyword::{
    KW_ATTACH, KW_CHARSET, KW_ENCODING, KW_KEY, KW_LOGO, KW_PHOTO, KW_SOUND, KW_TYPE,
};
use crate::line::lexer::Token;
use crate::property::{Parameters, Property, PropertyValue};

/// A content line split into its head and still-encoded value text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Group id before the dot, if any
    pub group: Option<String>,
    /// Property name, upper-cased
    pub name: String,
    /// Parameters in wire order, comma-separated values split into separate entries
    pub parameters: Parameters,
    /// Value text after the first unquoted colon
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Name,
    ParamName,
    ParamValue,
}

/// Split an unfolded line into group, name, parameters and value text.
///
/// Bare parameters without `=` (vCard 2.1, e.g. `TEL;HOME;VOICE:`) become `TYPE`
/// values, or `ENCODING` when they name a transfer encoding.
///
/// # Errors
///
/// Returns [`ParseWarning::MissingColon`] or [`ParseWarning::EmptyName`]; callers skip the line.
pub fn parse_line(text: &str, number: usize) -> Result<ContentLine, ParseWarning> {
    let mut stage = Stage::Name;
    let mut buf = String::new();
    let mut head = String::new();
    let mut param_name = String::new();
    let mut parameters = Parameters::new();
    let mut in_quotes = false;
    let mut value_start = None;

    for (token, span) in Token::lexer(text).spanned() {
        let raw = text.get(span.clone()).unwrap_or_default();
        match token {
            Ok(Token::DQuote) if stage == Stage::ParamValue => in_quotes = !in_quotes,
            Ok(Token::Colon) if !in_quotes => {
                finish_segment(stage, &mut buf, &mut head, &param_name, &mut parameters);
                value_start = Some(span.end);
                break;
            }
            Ok(Token::Semicolon) if !in_quotes => {
                finish_segment(stage, &mut buf, &mut head, &param_name, &mut parameters);
                stage = Stage::ParamName;
            }
            Ok(Token::Equal) if stage == Stage::ParamName => {
                param_name = std::mem::take(&mut buf);
                stage = Stage::ParamValue;
            }
            Ok(Token::Comma) if stage == Stage::ParamValue && !in_quotes => {
                parameters.push(param_name.trim(), std::mem::take(&mut buf));
            }
            _ => buf.push_str(raw),
        }
    }

    let Some(value_start) = value_start else {
        return Err(ParseWarning::MissingColon {
            line: number,
            text: text.to_owned(),
        });
    };

    let (group, name) = match head.split_once('.') {
        Some((group, name)) => (Some(group.trim().to_owned()), name.trim()),
        None => (None, head.trim()),
    };
    if name.is_empty() {
        return Err(ParseWarning::EmptyName { line: number });
    }

    Ok(ContentLine {
        group: group.filter(|g| !g.is_empty()),
        name: name.to_ascii_uppercase(),
        parameters,
        value: text.get(value_start..).unwrap_or_default().to_owned(),
    })
}

fn finish_segment(
    stage: Stage,
    buf: &mut String,
    head: &mut String,
    param_name: &str,
    parameters: &mut Parameters,
) {
    let segment = std::mem::take(buf);
    match stage {
        Stage::Name => *head = segment,
        Stage::ParamName => match segment.trim() {
            "" => {} // `;;` or a trailing `;`
            token if Encoding::is_known(token) => parameters.push(KW_ENCODING, token),
            token => parameters.push(KW_TYPE, token),
        },
        Stage::ParamValue => parameters.push(param_name.trim(), segment),
    }
}

/// Decode the value of a parsed line into a property.
///
/// Transfer-encoding and charset problems are recorded as warnings and the value text is
/// kept undecoded.
pub fn decode_property(line: ContentLine, warnings: &mut Vec<ParseWarning>) -> Property {
    let ContentLine {
        group,
        name,
        parameters,
        value,
    } = line;

    let kind = ValueKind::of(&name);
    let charset = parameters.get(KW_CHARSET);
    let decoded = match parameters.get(KW_ENCODING).map(Encoding::from_token) {
        None | Some(Encoding::SevenBit | Encoding::EightBit) => kind.parse(&value),
        Some(Encoding::Unknown(encoding)) => {
            record(
                warnings,
                ParseWarning::UnsupportedEncoding {
                    property: name.clone(),
                    encoding,
                },
            );
            PropertyValue::Text(value.clone())
        }
        Some(encoding) => match encoding.decode(&value) {
            None => {
                record(
                    warnings,
                    ParseWarning::MalformedEncodedValue {
                        property: name.clone(),
                        encoding: encoding.to_string(),
                    },
                );
                PropertyValue::Text(value.clone())
            }
            Some(bytes) if encoding == Encoding::Base64 && charset.is_none() => {
                match (is_binary(&name), String::from_utf8(bytes.into_owned())) {
                    (false, Ok(text)) => PropertyValue::Text(text),
                    (true, Ok(text)) => PropertyValue::Binary(text.into_bytes()),
                    (_, Err(err)) => PropertyValue::Binary(err.into_bytes()),
                }
            }
            Some(bytes) => {
                let text = decode_charset(&bytes, charset).unwrap_or_else(|| {
                    record(
                        warnings,
                        ParseWarning::UnsupportedCharset {
                            property: name.clone(),
                            charset: charset.unwrap_or_default().to_owned(),
                        },
                    );
                    String::from_utf8_lossy(&bytes).into_owned()
                });
                match encoding {
                    Encoding::Base64 => PropertyValue::Text(text),
                    _ => kind.parse(&text),
                }
            }
        },
    };

    let mut property = Property::new(name, decoded);
    property.group = group;
    property.parameters = parameters;
    property
}

/// Parse and decode one unfolded line.
///
/// # Errors
///
/// See [`parse_line`].
pub fn read_property(
    text: &str,
    number: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Property, ParseWarning> {
    parse_line(text, number).map(|line| decode_property(line, warnings))
}

/// Encode a property into one unfolded content line without terminator.
#[must_use]
pub fn encode_property(property: &Property) -> String {
    let mut line = String::new();
    if let Some(group) = &property.group {
        line.push_str(group);
        line.push('.');
    }
    line.push_str(property.name());

    for (name, value) in property.parameters.iter() {
        line.push(';');
        line.push_str(name);
        line.push('=');
        line.push_str(&quote_parameter(value));
    }

    let encoding = property
        .parameters
        .get(KW_ENCODING)
        .map(Encoding::from_token);
    if matches!(property.value, PropertyValue::Binary(_)) && encoding.is_none() {
        line.push_str(";ENCODING=b");
    }

    line.push(':');
    line.push_str(&encode_value(property, encoding.as_ref()));
    line
}

/// Encode a property and append it to `out` folded at `width` octets, CRLF-terminated.
pub fn write_property(out: &mut String, property: &Property, width: usize) {
    out.push_str(&fold(&encode_property(property), width));
    out.push_str("\r\n");
}

fn encode_value(property: &Property, encoding: Option<&Encoding>) -> String {
    let kind = ValueKind::of(property.name());
    let charset = property.parameters.get(KW_CHARSET);
    match encoding {
        Some(encoding @ (Encoding::Base64 | Encoding::QuotedPrintable)) => {
            let bytes = match (&property.value, encoding) {
                (PropertyValue::Binary(bytes), _) => bytes.clone(),
                (PropertyValue::Text(text), Encoding::Base64) => encode_charset(text, charset),
                (value, _) => encode_charset(&kind.format(value), charset),
            };
            encoding.encode(&bytes)
        }
        _ => kind.format(&property.value),
    }
}

fn quote_parameter(value: &str) -> String {
    let value = value.replace('"', "");
    if value.contains([':', ';', ',']) {
        format!("\"{value}\"")
    } else {
        value
    }
}

fn is_binary(name: &str) -> bool {
    [KW_PHOTO, KW_LOGO, KW_SOUND, KW_KEY, KW_ATTACH]
        .iter()
        .any(|k| k.eq_ignore_ascii_case(name))
}

/// Log a warning and keep it for the caller.
pub(crate) fn record(warnings: &mut Vec<ParseWarning>, warning: ParseWarning) {
    tracing::warn!(%warning, "recovered from malformed input");
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> (Property, Vec<ParseWarning>) {
        let mut warnings = Vec::new();
        let property = read_property(text, 1, &mut warnings).unwrap();
        (property, warnings)
    }

    #[test]
    fn parses_group_name_and_parameters() {
        let line = parse_line("item1.tel;type=CELL,VOICE;TYPE=pref:+1 555 0100", 1).unwrap();
        assert_eq!(line.group.as_deref(), Some("item1"));
        assert_eq!(line.name, "TEL");
        assert_eq!(
            line.parameters.get_all("TYPE").collect::<Vec<_>>(),
            ["CELL", "VOICE", "pref"]
        );
        assert_eq!(line.value, "+1 555 0100");
    }

    #[test]
    fn colon_inside_quotes_does_not_split() {
        let line = parse_line(r#"X-FOO;LABEL="a:b;c":value:with:colons"#, 1).unwrap();
        assert_eq!(line.parameters.get("LABEL"), Some("a:b;c"));
        assert_eq!(line.value, "value:with:colons");
    }

    #[test]
    fn bare_parameters_become_type_or_encoding() {
        let line = parse_line("TEL;HOME;VOICE;QUOTED-PRINTABLE:1", 1).unwrap();
        assert_eq!(line.parameters.get_all("TYPE").collect::<Vec<_>>(), ["HOME", "VOICE"]);
        assert_eq!(line.parameters.get("ENCODING"), Some("QUOTED-PRINTABLE"));
    }

    #[test]
    fn malformed_lines_are_warnings() {
        assert_eq!(
            parse_line("NOCOLON", 3),
            Err(ParseWarning::MissingColon {
                line: 3,
                text: "NOCOLON".into()
            })
        );
        assert_eq!(
            parse_line(":value", 4),
            Err(ParseWarning::EmptyName { line: 4 })
        );
        assert_eq!(
            parse_line("item1.:value", 5),
            Err(ParseWarning::EmptyName { line: 5 })
        );
    }

    #[test]
    fn decodes_escaped_text() {
        let (prop, warnings) = read(r"NOTE:one\, two\; three\nfour");
        assert!(warnings.is_empty());
        assert_eq!(prop.text(), Some("one, two; three\nfour"));
    }

    #[test]
    fn decodes_quoted_printable_with_charset() {
        let (prop, _) = read("NOTE;CHARSET=ISO-8859-1;ENCODING=QUOTED-PRINTABLE:M=FCller");
        assert_eq!(prop.text(), Some("Müller"));
    }

    #[test]
    fn decodes_base64_photo_as_binary() {
        let (prop, _) = read("PHOTO;ENCODING=b;TYPE=JPEG:/9j/4AAQ");
        assert_eq!(prop.value, PropertyValue::Binary(vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10]));
        assert_eq!(encode_property(&prop), "PHOTO;ENCODING=b;TYPE=JPEG:/9j/4AAQ");
    }

    #[test]
    fn unknown_encoding_passes_through() {
        let (prop, warnings) = read("NOTE;ENCODING=X-ZIP:abc\\,def");
        assert_eq!(prop.text(), Some("abc\\,def"));
        assert!(matches!(
            warnings.as_slice(),
            [ParseWarning::UnsupportedEncoding { encoding, .. }] if encoding == "X-ZIP"
        ));
    }

    #[test]
    fn malformed_base64_is_kept_as_text() {
        let (prop, warnings) = read("PHOTO;ENCODING=b:***");
        assert_eq!(prop.text(), Some("***"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn encodes_parameters_and_group() {
        let prop = Property::new("adr", PropertyValue::Structured(vec![
            String::new(),
            String::new(),
            "1 Main St, Apt 2".into(),
            "Springfield".into(),
        ]))
        .with_group("item2")
        .with_parameter("TYPE", "HOME")
        .with_parameter("X-LABEL", "a,b");
        assert_eq!(
            encode_property(&prop),
            r#"item2.ADR;TYPE=HOME;X-LABEL="a,b":;;1 Main St\, Apt 2;Springfield"#
        );
    }

    #[test]
    fn binary_value_gets_encoding_parameter() {
        let prop = Property::new("PHOTO", vec![1u8, 2, 3]);
        assert_eq!(encode_property(&prop), "PHOTO;ENCODING=b:AQID");
    }

    #[test]
    fn quoted_printable_round_trip() {
        let prop = Property::new("NOTE", "Grüße; line one\nline two".repeat(3))
            .with_parameter("ENCODING", "QUOTED-PRINTABLE")
            .with_parameter("CHARSET", "UTF-8");
        let mut out = String::new();
        write_property(&mut out, &prop, 75);
        let lines = unfold(&out);
        assert_eq!(lines.len(), 1);
        let (decoded, warnings) = read(&lines[0].text);
        assert!(warnings.is_empty());
        assert_eq!(decoded, prop);
    }

    #[test]
    fn long_value_round_trips_through_folding() {
        let text = "Lorem ipsum dolor sit amet, consectetur; adipiscing elit. ".repeat(5);
        let prop = Property::new("DESCRIPTION", text.as_str());
        let mut out = String::new();
        write_property(&mut out, &prop, 75);
        assert!(out.split("\r\n").all(|l| l.len() <= 75));
        let lines = unfold(&out);
        let (decoded, _) = read(&lines[0].text);
        assert_eq!(decoded.text(), Some(text.as_str()));
    }
}

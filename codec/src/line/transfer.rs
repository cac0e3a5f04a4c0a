// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content transfer encodings and charsets of property values.

use std::borrow::Cow;
use std::fmt::{self, Display};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use quoted_printable::ParseMode;

use crate::keyword::{
    KW_ENCODING_7BIT, KW_ENCODING_8BIT, KW_ENCODING_B, KW_ENCODING_BASE64, KW_ENCODING_QP,
};

/// Value of the `ENCODING` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// `B` (vCard 3.0) or `BASE64` (vCard 2.1, iCalendar)
    Base64,
    /// `QUOTED-PRINTABLE` (vCard 2.1)
    QuotedPrintable,
    /// `7BIT`, no transformation
    SevenBit,
    /// `8BIT`, no transformation
    EightBit,
    /// Any other token, passed through undecoded
    Unknown(String),
}

impl Encoding {
    /// Parse an `ENCODING` token, case-insensitively.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case(KW_ENCODING_B)
            || token.eq_ignore_ascii_case(KW_ENCODING_BASE64)
        {
            Self::Base64
        } else if token.eq_ignore_ascii_case(KW_ENCODING_QP) {
            Self::QuotedPrintable
        } else if token.eq_ignore_ascii_case(KW_ENCODING_7BIT) {
            Self::SevenBit
        } else if token.eq_ignore_ascii_case(KW_ENCODING_8BIT) {
            Self::EightBit
        } else {
            Self::Unknown(token.to_owned())
        }
    }

    /// Whether the token names a known encoding; used to classify bare vCard 2.1 parameters.
    #[must_use]
    pub fn is_known(token: &str) -> bool {
        !matches!(Self::from_token(token), Self::Unknown(_))
    }

    /// Decode value text into raw bytes; `None` when the payload is malformed.
    ///
    /// `7BIT`, `8BIT` and unknown encodings return the text bytes unchanged.
    #[must_use]
    pub fn decode<'a>(&self, text: &'a str) -> Option<Cow<'a, [u8]>> {
        match self {
            Self::Base64 => {
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                STANDARD
                    .decode(&compact)
                    .or_else(|_| STANDARD_NO_PAD.decode(&compact))
                    .ok()
                    .map(Cow::Owned)
            }
            Self::QuotedPrintable => quoted_printable::decode(text, ParseMode::Robust)
                .ok()
                .map(Cow::Owned),
            Self::SevenBit | Self::EightBit | Self::Unknown(_) => {
                Some(Cow::Borrowed(text.as_bytes()))
            }
        }
    }

    /// Encode raw bytes into value text.
    ///
    /// Quoted-printable output carries no soft line breaks; the line codec folds the line
    /// like any other. Hard line breaks are encoded as `=0D=0A`.
    #[must_use]
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => STANDARD.encode(bytes),
            Self::QuotedPrintable => quoted_printable::encode_to_str(bytes)
                .replace("=\r\n", "")
                .replace("\r\n", "=0D=0A")
                .replace('\n', "=0A"),
            Self::SevenBit | Self::EightBit | Self::Unknown(_) => {
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 => f.write_str(KW_ENCODING_B),
            Self::QuotedPrintable => f.write_str(KW_ENCODING_QP),
            Self::SevenBit => f.write_str(KW_ENCODING_7BIT),
            Self::EightBit => f.write_str(KW_ENCODING_8BIT),
            Self::Unknown(token) => f.write_str(token),
        }
    }
}

/// Decode bytes through the charset named by a `CHARSET` label.
///
/// Without a label the bytes are read as UTF-8. Returns `None` for unknown labels.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: Option<&str>) -> Option<String> {
    match charset {
        None => Some(String::from_utf8_lossy(bytes).into_owned()),
        Some(label) => {
            let encoding = encoding_rs::Encoding::for_label(label.trim().as_bytes())?;
            let (text, _, _) = encoding.decode(bytes);
            Some(text.into_owned())
        }
    }
}

/// Encode text into the charset named by a `CHARSET` label.
///
/// Without a label, or for unknown labels, the text is encoded as UTF-8.
#[must_use]
pub fn encode_charset(text: &str, charset: Option<&str>) -> Vec<u8> {
    match charset.and_then(|label| encoding_rs::Encoding::for_label(label.trim().as_bytes())) {
        Some(encoding) => encoding.encode(text).0.into_owned(),
        None => text.as_bytes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens() {
        assert_eq!(Encoding::from_token("b"), Encoding::Base64);
        assert_eq!(Encoding::from_token("BASE64"), Encoding::Base64);
        assert_eq!(Encoding::from_token("quoted-printable"), Encoding::QuotedPrintable);
        assert_eq!(Encoding::from_token("8bit"), Encoding::EightBit);
        assert_eq!(Encoding::from_token("x-zip"), Encoding::Unknown("x-zip".into()));
        assert!(Encoding::is_known("7BIT"));
        assert!(!Encoding::is_known("HOME"));
    }

    #[test]
    fn decodes_base64_with_whitespace() {
        let bytes = Encoding::Base64.decode("aGVs bG8=").unwrap();
        assert_eq!(bytes.as_ref(), b"hello");
        assert!(Encoding::Base64.decode("***").is_none());
    }

    #[test]
    fn quoted_printable_round_trip() {
        let text = "Grüße aus Köln\r\nzweite Zeile ".repeat(4);
        let encoded = Encoding::QuotedPrintable.encode(text.as_bytes());
        assert!(!encoded.contains('\n'));
        let decoded = Encoding::QuotedPrintable.decode(&encoded).unwrap();
        assert_eq!(decoded.as_ref(), text.as_bytes());
    }

    #[test]
    fn decodes_legacy_charsets() {
        // "Müller" in ISO-8859-1
        let bytes = [0x4d, 0xfc, 0x6c, 0x6c, 0x65, 0x72];
        assert_eq!(
            decode_charset(&bytes, Some("ISO-8859-1")).as_deref(),
            Some("Müller")
        );
        assert_eq!(encode_charset("Müller", Some("iso-8859-1")), bytes);
        assert!(decode_charset(&bytes, Some("x-unknown")).is_none());
    }
}

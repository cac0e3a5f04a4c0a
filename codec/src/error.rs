// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::field::FieldKind;

/// Errors that fail the conversion of a whole entity or field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A property the entity cannot exist without is absent
    #[error("Missing required property '{property}' in {component}")]
    MissingRequiredProperty {
        /// The component being materialized
        component: &'static str,
        /// The missing property name
        property: &'static str,
    },

    /// A multi-part field has no content in any of its structured components
    #[error("Refusing to encode empty {field} field")]
    EmptyField {
        /// The kind of field that was empty
        field: FieldKind,
    },

    /// The text contains no component of the expected type
    #[error("Expected '{expected}' component")]
    MissingComponent {
        /// The expected component name
        expected: &'static str,
    },

    /// A value could not be interpreted
    #[error("Invalid value '{value}' for property: {property}")]
    InvalidValue {
        /// The property name
        property: String,
        /// The offending value
        value: String,
    },

    /// A field codec was handed a field of another kind
    #[error("Expected {expected} field, found {found}")]
    FieldMismatch {
        /// The kind the codec handles
        expected: FieldKind,
        /// The kind it was given
        found: FieldKind,
    },
}

/// Recoverable problems found while reading; the offending line or value is skipped
/// or passed through and reading continues.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWarning {
    /// A blank line inside an object
    #[error("blank line {line}")]
    BlankLine {
        /// 1-based logical line number
        line: usize,
    },

    /// A content line without a name/value separator
    #[error("line {line} has no ':' separator: {text}")]
    MissingColon {
        /// 1-based logical line number
        line: usize,
        /// The offending text
        text: String,
    },

    /// A content line whose property name is empty
    #[error("line {line} has an empty property name")]
    EmptyName {
        /// 1-based logical line number
        line: usize,
    },

    /// An `ENCODING` token nobody understands, the value is kept undecoded
    #[error("unsupported encoding '{encoding}' on {property}")]
    UnsupportedEncoding {
        /// The property name
        property: String,
        /// The encoding token
        encoding: String,
    },

    /// A `CHARSET` label nobody understands, the bytes are read as UTF-8
    #[error("unsupported charset '{charset}' on {property}")]
    UnsupportedCharset {
        /// The property name
        property: String,
        /// The charset label
        charset: String,
    },

    /// Base64 or quoted-printable payload that failed to decode
    #[error("malformed {encoding} value on {property}")]
    MalformedEncodedValue {
        /// The property name
        property: String,
        /// The encoding token
        encoding: String,
    },

    /// An `END` without a matching `BEGIN`
    #[error("unmatched END:{name} at line {line}")]
    UnexpectedEnd {
        /// 1-based logical line number
        line: usize,
        /// The component name
        name: String,
    },

    /// A component still open at end of input, or closed implicitly by an outer `END`
    #[error("component {name} is not closed")]
    UnclosedComponent {
        /// The component name
        name: String,
    },

    /// A property line outside of any component
    #[error("property {name} outside of any component at line {line}")]
    PropertyOutsideComponent {
        /// 1-based logical line number
        line: usize,
        /// The property name
        name: String,
    },

    /// A property of a known field that could not be decoded, kept as an unmapped property
    #[error("invalid {property} value: {reason}")]
    InvalidValue {
        /// The property name
        property: String,
        /// Why decoding failed
        reason: String,
    },
}

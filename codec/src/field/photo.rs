// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::field::{ContactField, FieldKind, mismatch};
use crate::keyword::{KW_ENCODING, KW_ENCODING_B, KW_PHOTO, KW_TYPE, KW_VALUE, KW_VALUE_URI};
use crate::property::{Property, PropertyList, PropertyValue};

/// Photo bytes or a reference to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoData {
    /// Inline image bytes
    Inline(Vec<u8>),
    /// External URI
    Uri(String),
}

/// Contact photo, `PHOTO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Image data
    pub data: PhotoData,
    /// Media type such as `image/jpeg`
    pub media_type: Option<String>,
}

impl Photo {
    /// Decode a `PHOTO` property: inline base64, a `data:` URI, or an external URI.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] for a malformed `data:` URI.
    pub fn from_property(property: &Property) -> Result<Self, CodecError> {
        let type_media = property.parameters.get(KW_TYPE).map(media_type_of);
        match &property.value {
            PropertyValue::Binary(bytes) => Ok(Self {
                data: PhotoData::Inline(bytes.clone()),
                media_type: type_media,
            }),
            value => {
                let text = value.to_string();
                let text = text.trim();
                match text.strip_prefix("data:") {
                    Some(rest) => parse_data_uri(rest).ok_or_else(|| CodecError::InvalidValue {
                        property: KW_PHOTO.to_owned(),
                        value: text.chars().take(32).collect(),
                    }),
                    None => Ok(Self {
                        data: PhotoData::Uri(text.to_owned()),
                        media_type: type_media,
                    }),
                }
            }
        }
    }

    /// Encode into a `PHOTO` property, inline as `ENCODING=b` or as `VALUE=uri`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyField`] for empty data.
    pub fn to_properties(&self) -> Result<Vec<Property>, CodecError> {
        let property = match &self.data {
            PhotoData::Inline(bytes) if !bytes.is_empty() => {
                let mut property = Property::new(KW_PHOTO, bytes.clone())
                    .with_parameter(KW_ENCODING, KW_ENCODING_B);
                if let Some(kind) = self.media_type.as_deref().map(type_of_media) {
                    property.parameters.push(KW_TYPE, kind);
                }
                property
            }
            PhotoData::Uri(uri) if !uri.trim().is_empty() => {
                Property::new(KW_PHOTO, uri.trim()).with_parameter(KW_VALUE, KW_VALUE_URI)
            }
            _ => {
                return Err(CodecError::EmptyField {
                    field: FieldKind::Photo,
                });
            }
        };
        Ok(vec![property])
    }
}

/// `image/jpeg;base64,AAAA` after the `data:` prefix.
fn parse_data_uri(rest: &str) -> Option<Photo> {
    let (meta, payload) = rest.split_once(',')?;
    let mut meta = meta.split(';');
    let media_type = meta.next().filter(|m| !m.is_empty()).map(str::to_owned);
    if !meta.any(|m| m.eq_ignore_ascii_case("base64")) {
        return None;
    }
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    Some(Photo {
        data: PhotoData::Inline(bytes),
        media_type,
    })
}

/// `JPEG` → `image/jpeg`; full media types pass through.
fn media_type_of(kind: &str) -> String {
    if kind.contains('/') {
        kind.to_ascii_lowercase()
    } else {
        format!("image/{}", kind.to_ascii_lowercase())
    }
}

/// `image/jpeg` → `JPEG`.
fn type_of_media(media_type: &str) -> String {
    media_type
        .rsplit('/')
        .next()
        .unwrap_or(media_type)
        .to_ascii_uppercase()
}

pub(crate) fn decode(
    property: &Property,
    _properties: &PropertyList,
    _ctx: &CodecContext,
) -> Result<ContactField, CodecError> {
    Photo::from_property(property).map(ContactField::Photo)
}

pub(crate) fn encode(
    field: &ContactField,
    _group: Option<&str>,
    _ctx: &CodecContext,
) -> Result<Vec<Property>, CodecError> {
    match field {
        ContactField::Photo(photo) => photo.to_properties(),
        other => Err(mismatch(FieldKind::Photo, other)),
    }
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Field codecs for the multi-valued fields of a contact.
//!
//! Every field kind has a decode/encode function pair registered in a [`FieldRegistry`].
//! Decoding reads the primary property, its `TYPE` flags and the companion properties
//! sharing its group; encoding emits the primary property in a fresh group plus a
//! companion `X-ABLABEL` when the category needs one.

mod address;
mod date;
mod email;
mod phone;
mod photo;
mod profile;
mod related;
mod website;

pub use crate::field::address::Address;
pub use crate::field::date::ContactDate;
pub use crate::field::email::Email;
pub use crate::field::phone::Phone;
pub use crate::field::photo::{Photo, PhotoData};
pub use crate::field::profile::Profile;
pub use crate::field::related::RelatedPerson;
pub use crate::field::website::Website;

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::flags::TypeFlags;
use crate::keyword::{
    KW_ADR, KW_EMAIL, KW_PHOTO, KW_PREF, KW_TEL, KW_TYPE, KW_URL, KW_X_ABDATE, KW_X_ABLABEL,
    KW_X_ABRELATEDNAMES, KW_X_SOCIALPROFILE,
};
use crate::property::{Property, PropertyList, PropertyValue};

/// Tag of a field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum FieldKind {
    /// Postal address, `ADR`
    Address,
    /// Phone number, `TEL`
    Phone,
    /// Email address, `EMAIL`
    Email,
    /// Website, `URL`
    Website,
    /// Social profile, `X-SOCIALPROFILE`
    Profile,
    /// Labeled date, `X-ABDATE`
    Date,
    /// Related person, `X-ABRELATEDNAMES`
    Related,
    /// Photo, `PHOTO`
    Photo,
}

impl FieldKind {
    /// Every field kind, in emission order.
    pub const ALL: [Self; 8] = [
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::Website,
        Self::Profile,
        Self::Date,
        Self::Related,
        Self::Photo,
    ];

    /// Name of the primary property.
    #[must_use]
    pub const fn property_name(self) -> &'static str {
        match self {
            Self::Address => KW_ADR,
            Self::Phone => KW_TEL,
            Self::Email => KW_EMAIL,
            Self::Website => KW_URL,
            Self::Profile => KW_X_SOCIALPROFILE,
            Self::Date => KW_X_ABDATE,
            Self::Related => KW_X_ABRELATEDNAMES,
            Self::Photo => KW_PHOTO,
        }
    }

    /// Whether the primary property is emitted in its own group.
    #[must_use]
    pub const fn is_grouped(self) -> bool {
        !matches!(self, Self::Photo)
    }
}

/// A decoded field of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactField {
    /// Postal address
    Address(Address),
    /// Phone number
    Phone(Phone),
    /// Email address
    Email(Email),
    /// Website
    Website(Website),
    /// Social profile
    Profile(Profile),
    /// Labeled date
    Date(ContactDate),
    /// Related person
    Related(RelatedPerson),
    /// Photo
    Photo(Photo),
}

impl ContactField {
    /// The kind tag of this field.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Address(_) => FieldKind::Address,
            Self::Phone(_) => FieldKind::Phone,
            Self::Email(_) => FieldKind::Email,
            Self::Website(_) => FieldKind::Website,
            Self::Profile(_) => FieldKind::Profile,
            Self::Date(_) => FieldKind::Date,
            Self::Related(_) => FieldKind::Related,
            Self::Photo(_) => FieldKind::Photo,
        }
    }
}

/// Decode function of a field codec: primary property, all properties of the object.
pub type DecodeFn =
    fn(&Property, &PropertyList, &CodecContext) -> Result<ContactField, CodecError>;

/// Encode function of a field codec: field, group id for the emitted properties.
pub type EncodeFn =
    fn(&ContactField, Option<&str>, &CodecContext) -> Result<Vec<Property>, CodecError>;

/// Encode/decode function pair of one field kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldCodec {
    /// Field kind
    pub kind: FieldKind,
    /// Name of the primary property
    pub property: &'static str,
    /// Property to field
    pub decode: DecodeFn,
    /// Field to properties
    pub encode: EncodeFn,
}

macro_rules! field_codecs {
    ($($kind:ident => $module:ident),+ $(,)?) => {
        [$(
            FieldCodec {
                kind: FieldKind::$kind,
                property: FieldKind::$kind.property_name(),
                decode: $module::decode,
                encode: $module::encode,
            }
        ),+]
    };
}

/// Explicit table from field kind to codec, resolved once when the context is built.
#[derive(Debug, Clone, Copy)]
pub struct FieldRegistry {
    codecs: [FieldCodec; 8],
}

impl FieldRegistry {
    /// The codecs of every field kind.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            codecs: field_codecs![
                Phone => phone,
                Email => email,
                Address => address,
                Website => website,
                Profile => profile,
                Date => date,
                Related => related,
                Photo => photo,
            ],
        }
    }

    /// Codec whose primary property has this name.
    #[must_use]
    pub fn for_property(&self, name: &str) -> Option<&FieldCodec> {
        self.codecs
            .iter()
            .find(|c| c.property.eq_ignore_ascii_case(name))
    }

    /// Codec of a field kind.
    #[must_use]
    pub fn for_kind(&self, kind: FieldKind) -> Option<&FieldCodec> {
        self.codecs.iter().find(|c| c.kind == kind)
    }

    /// Iterate over the registered codecs.
    pub fn iter(&self) -> impl Iterator<Item = &FieldCodec> {
        self.codecs.iter()
    }

    /// Encode a field, allocating a group id when its kind is grouped.
    ///
    /// # Errors
    ///
    /// Returns the codec's error, e.g. [`CodecError::EmptyField`].
    pub fn encode(
        &self,
        field: &ContactField,
        groups: &mut GroupIds,
        ctx: &CodecContext,
    ) -> Result<Vec<Property>, CodecError> {
        let kind = field.kind();
        let codec = self.for_kind(kind).ok_or(CodecError::FieldMismatch {
            expected: kind,
            found: kind,
        })?;
        let group = kind.is_grouped().then(|| groups.peek());
        let properties = (codec.encode)(field, group.as_deref(), ctx)?;
        if group.is_some() {
            groups.commit();
        }
        Ok(properties)
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Allocator of `itemN` group ids that skips ids already in use.
#[derive(Debug, Clone, Default)]
pub struct GroupIds {
    next: usize,
    taken: Vec<String>,
}

impl GroupIds {
    /// Create an allocator avoiding the given ids.
    pub fn new<'a>(taken: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ids = Self {
            next: 1,
            taken: taken.into_iter().map(str::to_ascii_lowercase).collect(),
        };
        ids.skip_taken();
        ids
    }

    /// The id the next grouped field will get.
    #[must_use]
    pub fn peek(&self) -> String {
        format!("item{}", self.next)
    }

    /// Mark the current id as used and advance.
    pub fn commit(&mut self) {
        self.next += 1;
        self.skip_taken();
    }

    fn skip_taken(&mut self) {
        while self.taken.contains(&self.peek()) {
            self.next += 1;
        }
    }
}

/// Type flags of a property: its `TYPE` values, plus `PREF` for a vCard 4 `PREF` parameter.
pub(crate) fn flags_of<F: TypeFlags>(property: &Property) -> F {
    let flags = F::from_type_values(property.parameters.get_all(KW_TYPE));
    if property.parameters.get(KW_PREF).is_some() {
        flags | F::PREF
    } else {
        flags
    }
}

/// Text of the `X-ABLABEL` sharing the property's group.
pub(crate) fn companion_label<'a>(
    property: &Property,
    properties: &'a PropertyList,
) -> Option<&'a str> {
    companion(property, properties, KW_X_ABLABEL)
}

/// Text of the named property sharing the property's group.
pub(crate) fn companion<'a>(
    property: &Property,
    properties: &'a PropertyList,
    name: &str,
) -> Option<&'a str> {
    let group = property.group.as_deref()?;
    properties.find_in_group(group, name)?.text()
}

/// Primary property with `TYPE` parameters for the flags.
pub(crate) fn typed_property<F: TypeFlags>(
    name: &str,
    value: impl Into<PropertyValue>,
    group: Option<&str>,
    flags: F,
) -> Property {
    let mut property = Property::new(name, value);
    property.group = group.map(str::to_owned);
    for value in flags.type_values() {
        property.parameters.push(KW_TYPE, value);
    }
    property
}

/// Companion `X-ABLABEL` property in the group.
pub(crate) fn label_property(group: Option<&str>, label: &str) -> Property {
    let mut property = Property::new(KW_X_ABLABEL, label);
    property.group = group.map(str::to_owned);
    property
}

/// Text of a text property, or an error naming the field.
pub(crate) fn text_of(property: &Property) -> Result<&str, CodecError> {
    property.text().ok_or_else(|| CodecError::InvalidValue {
        property: property.name().to_owned(),
        value: property.value.to_string(),
    })
}

/// Check the field passed to an encode function is of the expected kind.
pub(crate) fn mismatch(expected: FieldKind, field: &ContactField) -> CodecError {
    CodecError::FieldMismatch {
        expected,
        found: field.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::PhoneFlags;

    #[test]
    fn registry_resolves_by_property_and_kind() {
        let registry = FieldRegistry::standard();
        assert_eq!(registry.for_property("tel").unwrap().kind, FieldKind::Phone);
        assert_eq!(
            registry.for_property("X-ABRELATEDNAMES").unwrap().kind,
            FieldKind::Related
        );
        assert!(registry.for_property("NOTE").is_none());
        for kind in FieldKind::ALL {
            assert_eq!(registry.for_kind(kind).unwrap().property, kind.property_name());
        }
    }

    #[test]
    fn group_ids_skip_taken() {
        let mut ids = GroupIds::new(["item1", "ITEM3"]);
        assert_eq!(ids.peek(), "item2");
        ids.commit();
        assert_eq!(ids.peek(), "item4");
    }

    #[test]
    fn reads_vcard4_pref_parameter() {
        let property = Property::new("TEL", "1")
            .with_parameter("TYPE", "cell")
            .with_parameter("PREF", "1");
        let flags: PhoneFlags = flags_of(&property);
        assert_eq!(flags, PhoneFlags::CELL | PhoneFlags::PREF);
    }
}

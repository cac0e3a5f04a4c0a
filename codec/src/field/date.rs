// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Date;

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::field::{
    ContactField, FieldKind, companion_label, flags_of, label_property, mismatch, text_of,
    typed_property,
};
use crate::flags::DateFlags;
use crate::keyword::KW_X_ABDATE;
use crate::mapping::DateKind;
use crate::property::{Property, PropertyList};
use crate::value::parse_date;

/// Labeled date, `X-ABDATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDate {
    /// The date
    pub date: Date,
    /// Category
    pub kind: DateKind,
    /// Whether the date is preferred
    pub is_preferred: bool,
    /// Free-text label of a custom category
    pub label: Option<String>,
}

impl ContactDate {
    /// A date of the given category.
    #[must_use]
    pub fn new(date: Date, kind: DateKind) -> Self {
        Self {
            date,
            kind,
            is_preferred: false,
            label: None,
        }
    }

    /// Decode an `X-ABDATE` property.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] when the value is not a date.
    pub fn from_property(
        property: &Property,
        properties: &PropertyList,
        ctx: &CodecContext,
    ) -> Result<Self, CodecError> {
        let text = text_of(property)?;
        let date = parse_date(text).ok_or_else(|| CodecError::InvalidValue {
            property: property.name().to_owned(),
            value: text.to_owned(),
        })?;
        let classified = ctx
            .tables
            .date
            .classify(flags_of::<DateFlags>(property), companion_label(property, properties));
        Ok(Self {
            date,
            kind: classified.category,
            is_preferred: classified.is_preferred,
            label: classified.label,
        })
    }

    /// Encode into an `X-ABDATE` property and its label.
    ///
    /// # Errors
    ///
    /// This encoder does not fail; the signature matches the other field codecs.
    pub fn to_properties(
        &self,
        group: Option<&str>,
        ctx: &CodecContext,
    ) -> Result<Vec<Property>, CodecError> {
        let (flags, label) =
            ctx.tables
                .date
                .to_wire(self.kind, self.is_preferred, self.label.as_deref());
        let mut properties = vec![typed_property(
            KW_X_ABDATE,
            self.date.to_string(),
            group,
            flags,
        )];
        properties.extend(label.map(|l| label_property(group, &l)));
        Ok(properties)
    }
}

pub(crate) fn decode(
    property: &Property,
    properties: &PropertyList,
    ctx: &CodecContext,
) -> Result<ContactField, CodecError> {
    ContactDate::from_property(property, properties, ctx).map(ContactField::Date)
}

pub(crate) fn encode(
    field: &ContactField,
    group: Option<&str>,
    ctx: &CodecContext,
) -> Result<Vec<Property>, CodecError> {
    match field {
        ContactField::Date(date) => date.to_properties(group, ctx),
        other => Err(mismatch(FieldKind::Date, other)),
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn anniversary_round_trips() {
        let ctx = CodecContext::default();
        let anniversary = ContactDate::new(date(2004, 6, 19), DateKind::Anniversary);
        let properties = anniversary.to_properties(Some("item5"), &ctx).unwrap();
        assert_eq!(properties[0].text(), Some("2004-06-19"));
        assert_eq!(properties[1].text(), Some("_$!<Anniversary>!$_"));

        let list: PropertyList = properties.into_iter().collect();
        let decoded =
            ContactDate::from_property(list.find("X-ABDATE").unwrap(), &list, &ctx).unwrap();
        assert_eq!(decoded, anniversary);
    }

    #[test]
    fn invalid_date_is_an_error() {
        let ctx = CodecContext::default();
        let list: PropertyList = [Property::new("X-ABDATE", "someday")].into_iter().collect();
        assert!(matches!(
            ContactDate::from_property(list.find("X-ABDATE").unwrap(), &list, &ctx),
            Err(CodecError::InvalidValue { .. })
        ));
    }
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::field::{
    ContactField, FieldKind, companion_label, flags_of, label_property, mismatch, text_of,
    typed_property,
};
use crate::flags::PhoneFlags;
use crate::keyword::KW_TEL;
use crate::mapping::PhoneKind;
use crate::property::{Property, PropertyList};

/// Phone number, `TEL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    /// The number as entered
    pub number: String,
    /// Category
    pub kind: PhoneKind,
    /// Whether the number is preferred
    pub is_preferred: bool,
    /// Free-text label of a custom category
    pub label: Option<String>,
}

impl Phone {
    /// A phone number of the given category.
    pub fn new(number: impl Into<String>, kind: PhoneKind) -> Self {
        Self {
            number: number.into(),
            kind,
            is_preferred: false,
            label: None,
        }
    }

    /// Decode a `TEL` property.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] for a non-text value.
    pub fn from_property(
        property: &Property,
        properties: &PropertyList,
        ctx: &CodecContext,
    ) -> Result<Self, CodecError> {
        let number = text_of(property)?;
        let classified = ctx
            .tables
            .phone
            .classify(flags_of::<PhoneFlags>(property), companion_label(property, properties));
        Ok(Self {
            number: number.to_owned(),
            kind: classified.category,
            is_preferred: classified.is_preferred,
            label: classified.label,
        })
    }

    /// Encode into a `TEL` property and its label.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyField`] for a blank number.
    pub fn to_properties(
        &self,
        group: Option<&str>,
        ctx: &CodecContext,
    ) -> Result<Vec<Property>, CodecError> {
        if self.number.trim().is_empty() {
            return Err(CodecError::EmptyField {
                field: FieldKind::Phone,
            });
        }
        let (flags, label) =
            ctx.tables
                .phone
                .to_wire(self.kind, self.is_preferred, self.label.as_deref());
        let mut properties = vec![typed_property(KW_TEL, self.number.as_str(), group, flags)];
        properties.extend(label.map(|l| label_property(group, &l)));
        Ok(properties)
    }
}

pub(crate) fn decode(
    property: &Property,
    properties: &PropertyList,
    ctx: &CodecContext,
) -> Result<ContactField, CodecError> {
    Phone::from_property(property, properties, ctx).map(ContactField::Phone)
}

pub(crate) fn encode(
    field: &ContactField,
    group: Option<&str>,
    ctx: &CodecContext,
) -> Result<Vec<Property>, CodecError> {
    match field {
        ContactField::Phone(phone) => phone.to_properties(group, ctx),
        other => Err(mismatch(FieldKind::Phone, other)),
    }
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::field::{
    ContactField, FieldKind, companion_label, flags_of, label_property, mismatch, text_of,
    typed_property,
};
use crate::flags::EmailFlags;
use crate::keyword::KW_EMAIL;
use crate::mapping::EmailKind;
use crate::property::{Property, PropertyList};

/// Email address, `EMAIL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// The address
    pub address: String,
    /// Category
    pub kind: EmailKind,
    /// Whether the address is preferred
    pub is_preferred: bool,
    /// Free-text label of a custom category
    pub label: Option<String>,
}

impl Email {
    /// An email address of the given category.
    pub fn new(address: impl Into<String>, kind: EmailKind) -> Self {
        Self {
            address: address.into(),
            kind,
            is_preferred: false,
            label: None,
        }
    }

    /// Decode an `EMAIL` property.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] for a non-text value.
    pub fn from_property(
        property: &Property,
        properties: &PropertyList,
        ctx: &CodecContext,
    ) -> Result<Self, CodecError> {
        let address = text_of(property)?;
        let classified = ctx
            .tables
            .email
            .classify(flags_of::<EmailFlags>(property), companion_label(property, properties));
        Ok(Self {
            address: address.trim().to_owned(),
            kind: classified.category,
            is_preferred: classified.is_preferred,
            label: classified.label,
        })
    }

    /// Encode into an `EMAIL` property and its label.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyField`] for a blank address.
    pub fn to_properties(
        &self,
        group: Option<&str>,
        ctx: &CodecContext,
    ) -> Result<Vec<Property>, CodecError> {
        if self.address.trim().is_empty() {
            return Err(CodecError::EmptyField {
                field: FieldKind::Email,
            });
        }
        let (flags, label) =
            ctx.tables
                .email
                .to_wire(self.kind, self.is_preferred, self.label.as_deref());
        let mut properties = vec![typed_property(KW_EMAIL, self.address.as_str(), group, flags)];
        properties.extend(label.map(|l| label_property(group, &l)));
        Ok(properties)
    }
}

pub(crate) fn decode(
    property: &Property,
    properties: &PropertyList,
    ctx: &CodecContext,
) -> Result<ContactField, CodecError> {
    Email::from_property(property, properties, ctx).map(ContactField::Email)
}

pub(crate) fn encode(
    field: &ContactField,
    group: Option<&str>,
    ctx: &CodecContext,
) -> Result<Vec<Property>, CodecError> {
    match field {
        ContactField::Email(email) => email.to_properties(group, ctx),
        other => Err(mismatch(FieldKind::Email, other)),
    }
}

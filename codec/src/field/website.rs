// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::field::{
    ContactField, FieldKind, companion_label, flags_of, label_property, mismatch, text_of,
    typed_property,
};
use crate::flags::WebsiteFlags;
use crate::keyword::KW_URL;
use crate::mapping::WebsiteKind;
use crate::property::{Property, PropertyList};

/// Website, `URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Website {
    /// The URL
    pub url: String,
    /// Category
    pub kind: WebsiteKind,
    /// Whether the website is preferred
    pub is_preferred: bool,
    /// Free-text label of a custom category
    pub label: Option<String>,
}

impl Website {
    /// A website of the given category.
    pub fn new(url: impl Into<String>, kind: WebsiteKind) -> Self {
        Self {
            url: url.into(),
            kind,
            is_preferred: false,
            label: None,
        }
    }

    /// Decode a `URL` property.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] for a non-text value.
    pub fn from_property(
        property: &Property,
        properties: &PropertyList,
        ctx: &CodecContext,
    ) -> Result<Self, CodecError> {
        let url = text_of(property)?;
        let classified = ctx.tables.website.classify(
            flags_of::<WebsiteFlags>(property),
            companion_label(property, properties),
        );
        Ok(Self {
            url: url.trim().to_owned(),
            kind: classified.category,
            is_preferred: classified.is_preferred,
            label: classified.label,
        })
    }

    /// Encode into a `URL` property and its label.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyField`] for a blank URL.
    pub fn to_properties(
        &self,
        group: Option<&str>,
        ctx: &CodecContext,
    ) -> Result<Vec<Property>, CodecError> {
        if self.url.trim().is_empty() {
            return Err(CodecError::EmptyField {
                field: FieldKind::Website,
            });
        }
        let (flags, label) =
            ctx.tables
                .website
                .to_wire(self.kind, self.is_preferred, self.label.as_deref());
        let mut properties = vec![typed_property(KW_URL, self.url.as_str(), group, flags)];
        properties.extend(label.map(|l| label_property(group, &l)));
        Ok(properties)
    }
}

pub(crate) fn decode(
    property: &Property,
    properties: &PropertyList,
    ctx: &CodecContext,
) -> Result<ContactField, CodecError> {
    Website::from_property(property, properties, ctx).map(ContactField::Website)
}

pub(crate) fn encode(
    field: &ContactField,
    group: Option<&str>,
    ctx: &CodecContext,
) -> Result<Vec<Property>, CodecError> {
    match field {
        ContactField::Website(website) => website.to_properties(group, ctx),
        other => Err(mismatch(FieldKind::Website, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homepage_travels_as_well_known_label() {
        let ctx = CodecContext::default();
        let website = Website::new("https://example.com", WebsiteKind::HomePage);
        let properties = website.to_properties(Some("item2"), &ctx).unwrap();
        assert_eq!(properties[1].text(), Some("_$!<HomePage>!$_"));
        assert_eq!(properties[1].group.as_deref(), Some("item2"));

        let list: PropertyList = properties.into_iter().collect();
        let decoded = Website::from_property(list.find("URL").unwrap(), &list, &ctx).unwrap();
        assert_eq!(decoded, website);
    }
}

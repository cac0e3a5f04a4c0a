// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::field::{
    ContactField, FieldKind, companion_label, flags_of, label_property, mismatch, text_of,
    typed_property,
};
use crate::flags::RelatedFlags;
use crate::keyword::KW_X_ABRELATEDNAMES;
use crate::mapping::RelatedKind;
use crate::property::{Property, PropertyList};

/// Related person, `X-ABRELATEDNAMES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedPerson {
    /// Name of the person
    pub name: String,
    /// Relation
    pub kind: RelatedKind,
    /// Whether the entry is preferred
    pub is_preferred: bool,
    /// Free-text label of a custom relation
    pub label: Option<String>,
}

impl RelatedPerson {
    /// A related person with the given relation.
    pub fn new(name: impl Into<String>, kind: RelatedKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_preferred: false,
            label: None,
        }
    }

    /// Decode an `X-ABRELATEDNAMES` property.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] for a non-text value.
    pub fn from_property(
        property: &Property,
        properties: &PropertyList,
        ctx: &CodecContext,
    ) -> Result<Self, CodecError> {
        let name = text_of(property)?;
        let classified = ctx.tables.related.classify(
            flags_of::<RelatedFlags>(property),
            companion_label(property, properties),
        );
        Ok(Self {
            name: name.to_owned(),
            kind: classified.category,
            is_preferred: classified.is_preferred,
            label: classified.label,
        })
    }

    /// Encode into an `X-ABRELATEDNAMES` property and its label.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyField`] for a blank name.
    pub fn to_properties(
        &self,
        group: Option<&str>,
        ctx: &CodecContext,
    ) -> Result<Vec<Property>, CodecError> {
        if self.name.trim().is_empty() {
            return Err(CodecError::EmptyField {
                field: FieldKind::Related,
            });
        }
        let (flags, label) =
            ctx.tables
                .related
                .to_wire(self.kind, self.is_preferred, self.label.as_deref());
        let mut properties = vec![typed_property(
            KW_X_ABRELATEDNAMES,
            self.name.as_str(),
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
    RelatedPerson::from_property(property, properties, ctx).map(ContactField::Related)
}

pub(crate) fn encode(
    field: &ContactField,
    group: Option<&str>,
    ctx: &CodecContext,
) -> Result<Vec<Property>, CodecError> {
    match field {
        ContactField::Related(related) => related.to_properties(group, ctx),
        other => Err(mismatch(FieldKind::Related, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relations_use_well_known_labels() {
        let ctx = CodecContext::default();
        let list: PropertyList = [
            Property::new("X-ABRELATEDNAMES", "Anna")
                .with_group("item4")
                .with_parameter("TYPE", "pref"),
            Property::new("X-ABLabel", "_$!<Sister>!$_").with_group("item4"),
        ]
        .into_iter()
        .collect();
        let person =
            RelatedPerson::from_property(list.find("X-ABRELATEDNAMES").unwrap(), &list, &ctx)
                .unwrap();
        assert_eq!(person.kind, RelatedKind::Sister);
        assert!(person.is_preferred);

        let properties = person.to_properties(Some("item1"), &ctx).unwrap();
        assert_eq!(properties[0].parameters.get("TYPE"), Some("PREF"));
        assert_eq!(properties[1].text(), Some("_$!<Sister>!$_"));
    }
}

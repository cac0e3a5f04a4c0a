// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::field::{
    ContactField, FieldKind, companion, companion_label, flags_of, label_property, mismatch,
    typed_property,
};
use crate::flags::AddressFlags;
use crate::keyword::{KW_ADR, KW_X_ABADR};
use crate::mapping::AddressKind;
use crate::property::{Property, PropertyList, PropertyValue};

/// Postal address, `ADR` (RFC 6350 Section 6.3.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Post office box
    pub po_box: String,
    /// Extended address, e.g. apartment or suite
    pub extended: String,
    /// Street address
    pub street: String,
    /// Locality, e.g. city
    pub city: String,
    /// Region, e.g. state or province
    pub region: String,
    /// Postal code
    pub postal_code: String,
    /// Country name
    pub country: String,
    /// ISO country code from the companion `X-ABADR`
    pub country_code: Option<String>,
    /// Category
    pub kind: AddressKind,
    /// Whether the address is preferred
    pub is_preferred: bool,
    /// Free-text label of a custom category
    pub label: Option<String>,
}

impl Address {
    /// An empty address of the given category.
    #[must_use]
    pub fn new(kind: AddressKind) -> Self {
        Self {
            po_box: String::new(),
            extended: String::new(),
            street: String::new(),
            city: String::new(),
            region: String::new(),
            postal_code: String::new(),
            country: String::new(),
            country_code: None,
            kind,
            is_preferred: false,
            label: None,
        }
    }

    /// Whether every structured component is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.po_box,
            &self.extended,
            &self.street,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|part| part.trim().is_empty())
    }

    /// Decode an `ADR` property and its companions.
    ///
    /// # Errors
    ///
    /// This decoder accepts any value; missing components are empty.
    pub fn from_property(
        property: &Property,
        properties: &PropertyList,
        ctx: &CodecContext,
    ) -> Result<Self, CodecError> {
        let value = &property.value;
        let classified = ctx
            .tables
            .address
            .classify(flags_of::<AddressFlags>(property), companion_label(property, properties));

        Ok(Self {
            po_box: value.part(0).to_owned(),
            extended: value.part(1).to_owned(),
            street: value.part(2).to_owned(),
            city: value.part(3).to_owned(),
            region: value.part(4).to_owned(),
            postal_code: value.part(5).to_owned(),
            country: value.part(6).to_owned(),
            country_code: companion(property, properties, KW_X_ABADR).map(str::to_owned),
            kind: classified.category,
            is_preferred: classified.is_preferred,
            label: classified.label,
        })
    }

    /// Encode into an `ADR` property and its companions.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyField`] when every structured component is blank.
    pub fn to_properties(
        &self,
        group: Option<&str>,
        ctx: &CodecContext,
    ) -> Result<Vec<Property>, CodecError> {
        if self.is_empty() {
            return Err(CodecError::EmptyField {
                field: FieldKind::Address,
            });
        }

        let (flags, label) =
            ctx.tables
                .address
                .to_wire(self.kind, self.is_preferred, self.label.as_deref());
        let value = PropertyValue::Structured(vec![
            self.po_box.clone(),
            self.extended.clone(),
            self.street.clone(),
            self.city.clone(),
            self.region.clone(),
            self.postal_code.clone(),
            self.country.clone(),
        ]);

        let mut properties = vec![typed_property(KW_ADR, value, group, flags)];
        if let Some(code) = self.country_code.as_deref().filter(|c| !c.is_empty()) {
            let mut abadr = Property::new(KW_X_ABADR, code);
            abadr.group = group.map(str::to_owned);
            properties.push(abadr);
        }
        if let Some(label) = label {
            properties.push(label_property(group, &label));
        }
        Ok(properties)
    }
}

pub(crate) fn decode(
    property: &Property,
    properties: &PropertyList,
    ctx: &CodecContext,
) -> Result<ContactField, CodecError> {
    Address::from_property(property, properties, ctx).map(ContactField::Address)
}

pub(crate) fn encode(
    field: &ContactField,
    group: Option<&str>,
    ctx: &CodecContext,
) -> Result<Vec<Property>, CodecError> {
    match field {
        ContactField::Address(address) => address.to_properties(group, ctx),
        other => Err(mismatch(FieldKind::Address, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_address() -> Address {
        Address {
            street: "1 Infinite Loop".into(),
            city: "Cupertino".into(),
            region: "CA".into(),
            postal_code: "95014".into(),
            country: "United States".into(),
            ..Address::new(AddressKind::Work)
        }
    }

    fn round_trip(address: &Address) -> Address {
        let ctx = CodecContext::default();
        let properties: PropertyList = address
            .to_properties(Some("item1"), &ctx)
            .unwrap()
            .into_iter()
            .collect();
        let primary = properties.find(KW_ADR).unwrap();
        Address::from_property(primary, &properties, &ctx).unwrap()
    }

    #[test]
    fn fully_populated_address_round_trips() {
        let address = full_address();
        assert_eq!(round_trip(&address), address);
    }

    #[test]
    fn custom_label_and_country_code_round_trip() {
        let address = Address {
            kind: AddressKind::Custom,
            label: Some("Cottage".into()),
            country_code: Some("us".into()),
            is_preferred: true,
            ..full_address()
        };
        assert_eq!(round_trip(&address), address);

        let school = Address {
            kind: AddressKind::School,
            ..full_address()
        };
        assert_eq!(round_trip(&school), school);
    }

    #[test]
    fn empty_address_is_rejected() {
        let ctx = CodecContext::default();
        let address = Address::new(AddressKind::Home);
        assert_eq!(
            address.to_properties(Some("item1"), &ctx),
            Err(CodecError::EmptyField {
                field: FieldKind::Address
            })
        );
    }

    #[test]
    fn emits_group_and_type() {
        let ctx = CodecContext::default();
        let properties = full_address().to_properties(Some("item7"), &ctx).unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].group.as_deref(), Some("item7"));
        assert_eq!(properties[0].parameters.get("TYPE"), Some("WORK"));
    }
}

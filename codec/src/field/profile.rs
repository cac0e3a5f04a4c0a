// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::context::CodecContext;
use crate::error::CodecError;
use crate::field::{
    ContactField, FieldKind, companion_label, flags_of, label_property, mismatch, text_of,
    typed_property,
};
use crate::flags::ProfileFlags;
use crate::keyword::{KW_X_SOCIALPROFILE, KW_X_USER};
use crate::mapping::ProfileKind;
use crate::property::{Property, PropertyList};

/// Social network profile, `X-SOCIALPROFILE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Profile URL
    pub url: String,
    /// User name on the network, from the `X-USER` parameter
    pub user: Option<String>,
    /// Network
    pub kind: ProfileKind,
    /// Whether the profile is preferred
    pub is_preferred: bool,
    /// Free-text label of a custom network
    pub label: Option<String>,
}

impl Profile {
    /// A profile on the given network.
    pub fn new(url: impl Into<String>, kind: ProfileKind) -> Self {
        Self {
            url: url.into(),
            user: None,
            kind,
            is_preferred: false,
            label: None,
        }
    }

    /// Decode an `X-SOCIALPROFILE` property.
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
        let classified = ctx.tables.profile.classify(
            flags_of::<ProfileFlags>(property),
            companion_label(property, properties),
        );
        Ok(Self {
            url: url.trim().to_owned(),
            user: property.parameters.get(KW_X_USER).map(str::to_owned),
            kind: classified.category,
            is_preferred: classified.is_preferred,
            label: classified.label,
        })
    }

    /// Encode into an `X-SOCIALPROFILE` property and its label.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyField`] when both URL and user name are blank.
    pub fn to_properties(
        &self,
        group: Option<&str>,
        ctx: &CodecContext,
    ) -> Result<Vec<Property>, CodecError> {
        let user = self.user.as_deref().filter(|u| !u.trim().is_empty());
        if self.url.trim().is_empty() && user.is_none() {
            return Err(CodecError::EmptyField {
                field: FieldKind::Profile,
            });
        }
        let (flags, label) =
            ctx.tables
                .profile
                .to_wire(self.kind, self.is_preferred, self.label.as_deref());
        let mut primary = typed_property(KW_X_SOCIALPROFILE, self.url.as_str(), group, flags);
        if let Some(user) = user {
            primary.parameters.push(KW_X_USER, user);
        }
        let mut properties = vec![primary];
        properties.extend(label.map(|l| label_property(group, &l)));
        Ok(properties)
    }
}

pub(crate) fn decode(
    property: &Property,
    properties: &PropertyList,
    ctx: &CodecContext,
) -> Result<ContactField, CodecError> {
    Profile::from_property(property, properties, ctx).map(ContactField::Profile)
}

pub(crate) fn encode(
    field: &ContactField,
    group: Option<&str>,
    ctx: &CodecContext,
) -> Result<Vec<Property>, CodecError> {
    match field {
        ContactField::Profile(profile) => profile.to_properties(group, ctx),
        other => Err(mismatch(FieldKind::Profile, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_network_and_user() {
        let ctx = CodecContext::default();
        let list: PropertyList = [Property::new("X-SOCIALPROFILE", "http://twitter.com/jdoe")
            .with_parameter("type", "twitter")
            .with_parameter("x-user", "jdoe")]
        .into_iter()
        .collect();
        let profile =
            Profile::from_property(list.find("X-SOCIALPROFILE").unwrap(), &list, &ctx).unwrap();
        assert_eq!(profile.kind, ProfileKind::Twitter);
        assert_eq!(profile.user.as_deref(), Some("jdoe"));

        let properties = profile.to_properties(None, &ctx).unwrap();
        assert_eq!(properties[0].parameters.get("TYPE"), Some("TWITTER"));
        assert_eq!(properties[0].parameters.get("X-USER"), Some("jdoe"));
    }

    #[test]
    fn unknown_network_without_label_is_other() {
        let ctx = CodecContext::default();
        let list: PropertyList = [Property::new("X-SOCIALPROFILE", "https://social.example/@me")
            .with_parameter("type", "mastodon")]
        .into_iter()
        .collect();
        let profile =
            Profile::from_property(list.find("X-SOCIALPROFILE").unwrap(), &list, &ctx).unwrap();
        assert_eq!(profile.kind, ProfileKind::Other);
    }
}

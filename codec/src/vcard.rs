// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! vCard objects: contacts and contact groups (RFC 2426, RFC 6350).
//!
//! A card is read into a [`Component`] first, then materialized by dispatching every
//! property either to a field codec from the [`FieldRegistry`](crate::FieldRegistry),
//! to a scalar slot of the entity, or to the entity's `extra` list. Unknown properties
//! keep their group and are written back unchanged.

use jiff::civil::Date;

use crate::context::CodecContext;
use crate::error::{CodecError, ParseWarning};
use crate::field::{
    Address, ContactDate, ContactField, Email, GroupIds, Phone, Photo, Profile, RelatedPerson,
    Website,
};
use crate::keyword::{
    KW_BDAY, KW_CATEGORIES, KW_FN, KW_KIND, KW_KIND_GROUP, KW_MEMBER, KW_N, KW_NICKNAME, KW_NOTE,
    KW_ORG, KW_PRODID, KW_REV, KW_TITLE, KW_UID, KW_URN_UUID, KW_VCARD, KW_VERSION, KW_X_ABADR,
    KW_X_ABLABEL, KW_X_ADDRESSBOOKSERVER_KIND, KW_X_ADDRESSBOOKSERVER_MEMBER,
};
use crate::line::record;
use crate::property::{Property, PropertyList, PropertyValue};
use crate::reader::{Component, Parsed, read_components};
use crate::value::parse_date;

/// Version written to every card.
pub const VCARD_VERSION: &str = "3.0";

/// Identity and revision shared by every object kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Unique identifier, `UID`
    pub uid: String,
    /// Product that produced the object, `PRODID`
    pub product_id: Option<String>,
    /// Last revision timestamp as written, `REV` or `LAST-MODIFIED`
    pub revision: Option<String>,
}

impl ObjectMeta {
    /// Metadata with a fresh random UID.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            uid: uuid::Uuid::new_v4().to_string(),
            product_id: None,
            revision: None,
        }
    }

    /// Read `UID`, `PRODID` and the revision property.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingRequiredProperty`] when `UID` is absent or blank.
    pub fn from_properties(
        properties: &PropertyList,
        component: &'static str,
        revision: &str,
    ) -> Result<Self, CodecError> {
        let text = |name: &str| {
            properties
                .find(name)
                .map(|p| p.value.to_string().trim().to_owned())
                .filter(|t| !t.is_empty())
        };
        Ok(Self {
            uid: text(KW_UID).ok_or(CodecError::MissingRequiredProperty {
                component,
                property: KW_UID,
            })?,
            product_id: text(KW_PRODID),
            revision: text(revision),
        })
    }

    fn check(&self, component: &'static str) -> Result<(), CodecError> {
        if self.uid.trim().is_empty() {
            return Err(CodecError::MissingRequiredProperty {
                component,
                property: KW_UID,
            });
        }
        Ok(())
    }
}

/// Structured name, `N`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredName {
    /// Family name
    pub family: String,
    /// Given name
    pub given: String,
    /// Additional names
    pub additional: String,
    /// Honorific prefixes
    pub prefix: String,
    /// Honorific suffixes
    pub suffix: String,
}

impl StructuredName {
    fn from_value(value: &PropertyValue) -> Self {
        Self {
            family: value.part(0).to_owned(),
            given: value.part(1).to_owned(),
            additional: value.part(2).to_owned(),
            prefix: value.part(3).to_owned(),
            suffix: value.part(4).to_owned(),
        }
    }

    fn to_value(&self) -> PropertyValue {
        PropertyValue::Structured(vec![
            self.family.clone(),
            self.given.clone(),
            self.additional.clone(),
            self.prefix.clone(),
            self.suffix.clone(),
        ])
    }

    /// Whether every part is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_value().is_empty()
    }

    /// Parts joined in reading order: prefix, given, additional, family, suffix.
    #[must_use]
    pub fn display(&self) -> String {
        [
            &self.prefix,
            &self.given,
            &self.additional,
            &self.family,
            &self.suffix,
        ]
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// A person or organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    /// Identity
    pub meta: ObjectMeta,
    /// Formatted name, `FN`
    pub formatted_name: String,
    /// Structured name, `N`
    pub name: StructuredName,
    /// Nicknames, `NICKNAME`
    pub nickname: Vec<String>,
    /// Organization name, first part of `ORG`
    pub organization: Option<String>,
    /// Organizational unit, second part of `ORG`
    pub department: Option<String>,
    /// Job title, `TITLE`
    pub job_title: Option<String>,
    /// Note, `NOTE`
    pub note: Option<String>,
    /// Birthday, `BDAY`
    pub birthday: Option<Date>,
    /// Categories, `CATEGORIES`
    pub categories: Vec<String>,
    /// Phone numbers
    pub phones: Vec<Phone>,
    /// Email addresses
    pub emails: Vec<Email>,
    /// Postal addresses
    pub addresses: Vec<Address>,
    /// Websites
    pub websites: Vec<Website>,
    /// Social profiles
    pub profiles: Vec<Profile>,
    /// Labeled dates
    pub dates: Vec<ContactDate>,
    /// Related people
    pub related: Vec<RelatedPerson>,
    /// Photo
    pub photo: Option<Photo>,
    /// Properties without a typed slot, in wire order
    pub extra: PropertyList,
}

impl Contact {
    /// A contact with a fresh UID.
    pub fn new(formatted_name: impl Into<String>) -> Self {
        Self {
            meta: ObjectMeta::generate(),
            formatted_name: formatted_name.into(),
            ..Self::default()
        }
    }

    /// The name to show: `FN`, else the structured name, else the organization.
    #[must_use]
    pub fn display_name(&self) -> String {
        if !self.formatted_name.trim().is_empty() {
            return self.formatted_name.trim().to_owned();
        }
        let name = self.name.display();
        if !name.is_empty() {
            return name;
        }
        self.organization.clone().unwrap_or_default()
    }

    /// Add a decoded field to its typed collection.
    pub fn push_field(&mut self, field: ContactField) {
        match field {
            ContactField::Address(v) => self.addresses.push(v),
            ContactField::Phone(v) => self.phones.push(v),
            ContactField::Email(v) => self.emails.push(v),
            ContactField::Website(v) => self.websites.push(v),
            ContactField::Profile(v) => self.profiles.push(v),
            ContactField::Date(v) => self.dates.push(v),
            ContactField::Related(v) => self.related.push(v),
            ContactField::Photo(v) => self.photo = Some(v),
        }
    }

    /// Every multi-valued field, in emission order.
    #[must_use]
    pub fn fields(&self) -> Vec<ContactField> {
        let mut fields = Vec::new();
        fields.extend(self.phones.iter().cloned().map(ContactField::Phone));
        fields.extend(self.emails.iter().cloned().map(ContactField::Email));
        fields.extend(self.addresses.iter().cloned().map(ContactField::Address));
        fields.extend(self.websites.iter().cloned().map(ContactField::Website));
        fields.extend(self.profiles.iter().cloned().map(ContactField::Profile));
        fields.extend(self.dates.iter().cloned().map(ContactField::Date));
        fields.extend(self.related.iter().cloned().map(ContactField::Related));
        fields.extend(self.photo.iter().cloned().map(ContactField::Photo));
        fields
    }

    fn from_properties(
        meta: ObjectMeta,
        properties: &PropertyList,
        ctx: &CodecContext,
        warnings: &mut Vec<ParseWarning>,
    ) -> Self {
        let mut contact = Self {
            meta,
            ..Self::default()
        };
        let mut claimed: Vec<&str> = Vec::new();
        let mut leftovers: Vec<&Property> = Vec::new();

        for property in properties {
            if let Some(codec) = ctx.fields.for_property(property.name()) {
                match (codec.decode)(property, properties, ctx) {
                    Ok(field) => {
                        claimed.extend(property.group.as_deref());
                        contact.push_field(field);
                    }
                    Err(err) => {
                        record(
                            warnings,
                            ParseWarning::InvalidValue {
                                property: property.name().to_owned(),
                                reason: err.to_string(),
                            },
                        );
                        leftovers.push(property);
                    }
                }
                continue;
            }

            let text = || property.value.to_string().trim().to_owned();
            let parts = || {
                property
                    .value
                    .parts()
                    .into_iter()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            };
            match property.name() {
                KW_VERSION | KW_UID | KW_PRODID | KW_REV => {}
                KW_FN if contact.formatted_name.is_empty() => contact.formatted_name = text(),
                KW_N if contact.name.is_empty() => {
                    contact.name = StructuredName::from_value(&property.value);
                }
                KW_NICKNAME => contact.nickname.extend(parts()),
                KW_ORG if contact.organization.is_none() => {
                    let org = &property.value;
                    contact.organization = Some(org.part(0).trim().to_owned());
                    contact.department =
                        Some(org.part(1).trim().to_owned()).filter(|d| !d.is_empty());
                }
                KW_TITLE if contact.job_title.is_none() => contact.job_title = Some(text()),
                KW_NOTE if contact.note.is_none() => {
                    contact.note = Some(property.value.to_string());
                }
                KW_CATEGORIES => contact.categories.extend(parts()),
                KW_BDAY if contact.birthday.is_none() => match parse_date(&text()) {
                    Some(date) => contact.birthday = Some(date),
                    None => {
                        record(
                            warnings,
                            ParseWarning::InvalidValue {
                                property: KW_BDAY.to_owned(),
                                reason: format!("'{}' is not a date", text()),
                            },
                        );
                        leftovers.push(property);
                    }
                },
                _ => leftovers.push(property),
            }
        }

        contact.extra = leftovers
            .into_iter()
            .filter(|p| !is_claimed_companion(p, &claimed))
            .cloned()
            .collect();
        contact
    }

    fn to_properties(&self, ctx: &CodecContext) -> Result<PropertyList, CodecError> {
        self.meta.check(KW_VCARD)?;
        let mut properties = header(&self.meta, ctx);
        properties.push(Property::new(KW_FN, self.display_name()));
        properties.push(Property::new(KW_N, self.name.to_value()));
        if !self.nickname.is_empty() {
            properties.push(Property::new(
                KW_NICKNAME,
                PropertyValue::List(self.nickname.clone()),
            ));
        }
        if self.organization.is_some() || self.department.is_some() {
            let mut org = vec![self.organization.clone().unwrap_or_default()];
            org.extend(self.department.clone());
            properties.push(Property::new(KW_ORG, PropertyValue::Structured(org)));
        }
        if let Some(title) = &self.job_title {
            properties.push(Property::new(KW_TITLE, title.as_str()));
        }
        if let Some(note) = &self.note {
            properties.push(Property::new(KW_NOTE, note.as_str()));
        }
        if let Some(birthday) = self.birthday {
            properties.push(Property::new(KW_BDAY, birthday.to_string()));
        }
        if !self.categories.is_empty() {
            properties.push(Property::new(
                KW_CATEGORIES,
                PropertyValue::List(self.categories.clone()),
            ));
        }

        let mut groups = GroupIds::new(self.extra.groups());
        for field in self.fields() {
            match ctx.fields.encode(&field, &mut groups, ctx) {
                Ok(emitted) => properties.extend(emitted),
                Err(CodecError::EmptyField { field }) => {
                    tracing::debug!(uid = %self.meta.uid, %field, "skipping empty field");
                }
                Err(err) => return Err(err),
            }
        }

        properties.extend(self.extra.iter().cloned());
        Ok(properties)
    }
}

/// A named set of contacts, Apple style (`X-ADDRESSBOOKSERVER-KIND:group`) or vCard 4
/// style (`KIND:group`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactGroup {
    /// Identity
    pub meta: ObjectMeta,
    /// Group name, `FN`
    pub name: String,
    /// UIDs of the member contacts
    pub members: Vec<String>,
    /// Properties without a typed slot, in wire order
    pub extra: PropertyList,
}

impl ContactGroup {
    /// A group with a fresh UID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: ObjectMeta::generate(),
            name: name.into(),
            ..Self::default()
        }
    }

    fn from_properties(meta: ObjectMeta, properties: &PropertyList) -> Self {
        let mut group = Self {
            meta,
            ..Self::default()
        };
        for property in properties {
            match property.name() {
                KW_VERSION | KW_UID | KW_PRODID | KW_REV | KW_N | KW_KIND
                | KW_X_ADDRESSBOOKSERVER_KIND => {}
                KW_FN if group.name.is_empty() => {
                    group.name = property.value.to_string().trim().to_owned();
                }
                KW_MEMBER | KW_X_ADDRESSBOOKSERVER_MEMBER => {
                    let member = property.value.to_string();
                    let member = member.trim();
                    let uid = strip_prefix_ignore_case(member, KW_URN_UUID).unwrap_or(member);
                    if !uid.is_empty() {
                        group.members.push(uid.to_owned());
                    }
                }
                _ => group.extra.push(property.clone()),
            }
        }
        if group.name.is_empty()
            && let Some(n) = properties.find(KW_N)
        {
            group.name = n.value.part(0).trim().to_owned();
        }
        group
    }

    fn to_properties(&self, ctx: &CodecContext) -> Result<PropertyList, CodecError> {
        self.meta.check(KW_VCARD)?;
        let mut properties = header(&self.meta, ctx);
        properties.push(Property::new(KW_FN, self.name.as_str()));
        properties.push(Property::new(
            KW_N,
            PropertyValue::Structured(vec![self.name.clone(), String::new()]),
        ));
        properties.push(Property::new(KW_X_ADDRESSBOOKSERVER_KIND, KW_KIND_GROUP));
        for member in &self.members {
            properties.push(Property::new(
                KW_X_ADDRESSBOOKSERVER_MEMBER,
                format!("{KW_URN_UUID}{member}"),
            ));
        }
        properties.extend(self.extra.iter().cloned());
        Ok(properties)
    }
}

/// A vCard object: either a contact or a contact group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    /// A person or organization
    Contact(Contact),
    /// A group of contacts
    Group(ContactGroup),
}

impl Card {
    /// Identity of the card.
    #[must_use]
    pub fn meta(&self) -> &ObjectMeta {
        match self {
            Self::Contact(contact) => &contact.meta,
            Self::Group(group) => &group.meta,
        }
    }

    /// UID of the card.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.meta().uid
    }

    /// Parse the first card of the text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingComponent`] when the text holds no `VCARD`, or the
    /// error of materializing it.
    pub fn parse(text: &str, ctx: &CodecContext) -> Result<Parsed<Self>, CodecError> {
        let Parsed { value, warnings } = Self::parse_all(text, ctx);
        let card = value.into_iter().next().ok_or(CodecError::MissingComponent {
            expected: KW_VCARD,
        })??;
        Ok(Parsed {
            value: card,
            warnings,
        })
    }

    /// Parse every card of the text; a card that fails does not affect the others.
    #[must_use]
    pub fn parse_all(text: &str, ctx: &CodecContext) -> Parsed<Vec<Result<Self, CodecError>>> {
        let Parsed {
            value: components,
            mut warnings,
        } = read_components(text);
        let cards = components
            .iter()
            .filter(|c| c.is(KW_VCARD))
            .map(|c| Self::from_component(c, ctx, &mut warnings))
            .collect();
        Parsed {
            value: cards,
            warnings,
        }
    }

    /// Materialize a `VCARD` component.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingComponent`] for another component type and
    /// [`CodecError::MissingRequiredProperty`] when `UID` is absent.
    pub fn from_component(
        component: &Component,
        ctx: &CodecContext,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Self, CodecError> {
        if !component.is(KW_VCARD) {
            return Err(CodecError::MissingComponent {
                expected: KW_VCARD,
            });
        }

        let properties = &component.properties;
        let meta = ObjectMeta::from_properties(properties, KW_VCARD, KW_REV)?;
        Ok(if is_group(properties) {
            Self::Group(ContactGroup::from_properties(meta, properties))
        } else {
            Self::Contact(Contact::from_properties(meta, properties, ctx, warnings))
        })
    }

    /// Build the `VCARD` component.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingRequiredProperty`] for a blank UID, or a field codec
    /// error other than [`CodecError::EmptyField`]; empty fields are skipped.
    pub fn to_component(&self, ctx: &CodecContext) -> Result<Component, CodecError> {
        let mut component = Component::new(KW_VCARD);
        component.properties = match self {
            Self::Contact(contact) => contact.to_properties(ctx)?,
            Self::Group(group) => group.to_properties(ctx)?,
        };
        Ok(component)
    }

    /// Write as `text/vcard`.
    ///
    /// # Errors
    ///
    /// See [`Card::to_component`].
    pub fn format(&self, ctx: &CodecContext) -> Result<String, CodecError> {
        Ok(self.to_component(ctx)?.to_text(ctx.fold_width))
    }
}

impl From<Contact> for Card {
    fn from(contact: Contact) -> Self {
        Self::Contact(contact)
    }
}

impl From<ContactGroup> for Card {
    fn from(group: ContactGroup) -> Self {
        Self::Group(group)
    }
}

fn header(meta: &ObjectMeta, ctx: &CodecContext) -> PropertyList {
    let mut properties = PropertyList::new();
    properties.push(Property::new(KW_VERSION, VCARD_VERSION));
    properties.push(Property::new(
        KW_PRODID,
        meta.product_id.as_deref().unwrap_or(&ctx.product_id),
    ));
    properties.push(Property::new(KW_UID, meta.uid.as_str()));
    if let Some(revision) = &meta.revision {
        properties.push(Property::new(KW_REV, revision.as_str()));
    }
    properties
}

fn is_group(properties: &PropertyList) -> bool {
    [KW_KIND, KW_X_ADDRESSBOOKSERVER_KIND].iter().any(|name| {
        properties
            .find(name)
            .is_some_and(|p| p.value.to_string().trim().eq_ignore_ascii_case(KW_KIND_GROUP))
    })
}

fn is_claimed_companion(property: &Property, claimed: &[&str]) -> bool {
    (property.is(KW_X_ABLABEL) || property.is(KW_X_ABADR))
        && property
            .group
            .as_deref()
            .is_some_and(|g| claimed.iter().any(|c| c.eq_ignore_ascii_case(g)))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| text.get(prefix.len()..))
        .flatten()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::field::FieldKind;
    use crate::mapping::{AddressKind, EmailKind, PhoneKind};

    const APPLE_CARD: &str = "BEGIN:VCARD\r\n\
        VERSION:3.0\r\n\
        PRODID:-//Apple Inc.//iOS 17.0//EN\r\n\
        N:Appleseed;Johnny;;;\r\n\
        FN:Johnny Appleseed\r\n\
        ORG:Apple Inc.;Engineering\r\n\
        item1.EMAIL;type=INTERNET;type=pref:johnny@example.com\r\n\
        item1.X-ABLabel:_$!<Other>!$_\r\n\
        TEL;type=HOME;type=VOICE;type=pref:555-0100\r\n\
        item2.X-ABDATE:2004-06-19\r\n\
        item2.X-ABLabel:_$!<Anniversary>!$_\r\n\
        item3.X-CUSTOM:kept\r\n\
        item3.X-ABLabel:also kept\r\n\
        BDAY;value=date:1970-01-01\r\n\
        UID:1234-5678\r\n\
        END:VCARD\r\n";

    fn contact(card: Card) -> Contact {
        match card {
            Card::Contact(contact) => contact,
            Card::Group(_) => panic!("expected a contact"),
        }
    }

    #[test]
    fn reads_apple_card() {
        let ctx = CodecContext::default();
        let parsed = Card::parse(APPLE_CARD, &ctx).unwrap();
        assert!(parsed.warnings.is_empty());
        let contact = contact(parsed.value);

        assert_eq!(contact.meta.uid, "1234-5678");
        assert_eq!(contact.formatted_name, "Johnny Appleseed");
        assert_eq!(contact.name.given, "Johnny");
        assert_eq!(contact.organization.as_deref(), Some("Apple Inc."));
        assert_eq!(contact.department.as_deref(), Some("Engineering"));
        assert_eq!(contact.birthday, Some(date(1970, 1, 1)));

        assert_eq!(contact.emails[0].kind, EmailKind::Other);
        assert!(contact.emails[0].is_preferred);
        assert_eq!(contact.phones[0].kind, PhoneKind::Home);
        assert!(contact.phones[0].is_preferred);
        assert_eq!(contact.dates[0].date, date(2004, 6, 19));

        let extra: Vec<_> = contact.extra.iter().map(Property::name).collect();
        assert_eq!(extra, ["X-CUSTOM", "X-ABLABEL"]);
    }

    #[test]
    fn round_trips_through_text() {
        let ctx = CodecContext::default();
        let original = contact(Card::parse(APPLE_CARD, &ctx).unwrap().value);
        let text = Card::Contact(original.clone()).format(&ctx).unwrap();
        let reparsed = contact(Card::parse(&text, &ctx).unwrap().value);
        assert_eq!(reparsed, original);
    }

    #[test]
    fn fresh_groups_avoid_unknown_groups() {
        let ctx = CodecContext::default();
        let original = contact(Card::parse(APPLE_CARD, &ctx).unwrap().value);
        let text = Card::Contact(original).format(&ctx).unwrap();
        assert!(text.contains("item1.TEL;TYPE=HOME;TYPE=VOICE;TYPE=PREF:555-0100\r\n"));
        assert!(text.contains("item2.EMAIL;TYPE=INTERNET;TYPE=PREF:johnny@example.com\r\n"));
        assert!(text.contains("item4.X-ABDATE:2004-06-19\r\n"));
        assert!(text.contains("item3.X-CUSTOM:kept\r\n"));
    }

    #[test]
    fn missing_uid_fails_the_card() {
        let ctx = CodecContext::default();
        let text = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Nobody\r\nEND:VCARD\r\n";
        assert_eq!(
            Card::parse(text, &ctx),
            Err(CodecError::MissingRequiredProperty {
                component: "VCARD",
                property: "UID"
            })
        );
    }

    #[test]
    fn one_bad_card_does_not_affect_others() {
        let ctx = CodecContext::default();
        let text = "BEGIN:VCARD\r\nFN:Nobody\r\nEND:VCARD\r\n\
                    BEGIN:VCARD\r\nUID:ok\r\nFN:Somebody\r\nEND:VCARD\r\n";
        let parsed = Card::parse_all(text, &ctx);
        assert_eq!(parsed.value.len(), 2);
        assert!(parsed.value[0].is_err());
        assert_eq!(parsed.value[1].as_ref().map(Card::uid), Ok("ok"));
    }

    #[test]
    fn empty_address_is_not_written() {
        let ctx = CodecContext::default();
        let mut contact = Contact::new("Jane Doe");
        contact.addresses.push(Address::new(AddressKind::Home));
        contact.phones.push(Phone::new("555-0199", PhoneKind::Mobile));
        let text = Card::Contact(contact).format(&ctx).unwrap();
        assert!(!text.contains("ADR"));
        assert!(text.contains("item1.TEL;TYPE=CELL;TYPE=VOICE:555-0199\r\n"));
    }

    #[test]
    fn unreadable_field_is_kept_as_extra() {
        let ctx = CodecContext::default();
        let text = "BEGIN:VCARD\r\nUID:1\r\nitem1.X-ABDATE:someday\r\nitem1.X-ABLABEL:Party\r\nEND:VCARD\r\n";
        let parsed = Card::parse(text, &ctx).unwrap();
        assert!(matches!(
            parsed.warnings.as_slice(),
            [ParseWarning::InvalidValue { property, .. }] if property == "X-ABDATE"
        ));
        let contact = contact(parsed.value);
        assert!(contact.dates.is_empty());
        assert_eq!(contact.extra.len(), 2);
        assert_eq!(
            ctx.fields.for_kind(FieldKind::Date).map(|c| c.property),
            Some("X-ABDATE")
        );
    }

    #[test]
    fn reads_and_writes_groups() {
        let ctx = CodecContext::default();
        let text = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:g1\r\nFN:Friends\r\n\
                    X-ADDRESSBOOKSERVER-KIND:group\r\n\
                    X-ADDRESSBOOKSERVER-MEMBER:urn:uuid:a\r\n\
                    X-ADDRESSBOOKSERVER-MEMBER:urn:uuid:b\r\nEND:VCARD\r\n";
        let Card::Group(group) = Card::parse(text, &ctx).unwrap().value else {
            panic!("expected a group");
        };
        assert_eq!(group.name, "Friends");
        assert_eq!(group.members, ["a", "b"]);

        let written = Card::Group(group.clone()).format(&ctx).unwrap();
        assert!(written.contains("X-ADDRESSBOOKSERVER-MEMBER:urn:uuid:b\r\n"));
        let Card::Group(reparsed) = Card::parse(&written, &ctx).unwrap().value else {
            panic!("expected a group");
        };
        assert_eq!(reparsed.name, group.name);
        assert_eq!(reparsed.members, group.members);
        assert!(reparsed.extra.is_empty());

        let v4 = "BEGIN:VCARD\r\nVERSION:4.0\r\nUID:g2\r\nFN:Team\r\nKIND:group\r\n\
                  MEMBER:urn:uuid:c\r\nEND:VCARD\r\n";
        assert!(matches!(Card::parse(v4, &ctx).unwrap().value, Card::Group(g) if g.members == ["c"]));
    }
}

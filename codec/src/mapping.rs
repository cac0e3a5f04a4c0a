// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Mapping tables between wire type flags and field categories.
//!
//! Each table is an ordered list of `(flags, category)` entries. Decoding returns the
//! category of the **first** entry whose flags are all present; the order is the
//! tie-break for flag combinations that satisfy several entries, so a phone typed
//! `IPHONE,CELL,VOICE` is an iPhone and not a mobile. `PREF` never takes part in a
//! lookup.
//!
//! Categories without flags travel as a companion `X-ABLABEL` property, either as one of
//! a few well-known labels (`_$!<School>!$_`) or as free text for custom categories.

use crate::flags::{
    AddressFlags, DateFlags, EmailFlags, PhoneFlags, ProfileFlags, RelatedFlags, TypeFlags,
    WebsiteFlags,
};

/// Category of a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum PhoneKind {
    /// iPhone
    #[strum(serialize = "iPhone")]
    IPhone,
    /// Mobile
    Mobile,
    /// Main
    Main,
    /// Home fax
    HomeFax,
    /// Work fax
    WorkFax,
    /// Other fax
    OtherFax,
    /// Pager
    Pager,
    /// Home
    Home,
    /// Work
    Work,
    /// Other
    Other,
    /// Free-text label
    Custom,
}

/// Category of a postal address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum AddressKind {
    /// Home
    Home,
    /// Work
    Work,
    /// School
    School,
    /// Other
    Other,
    /// Free-text label
    Custom,
}

/// Category of an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum EmailKind {
    /// Home
    Home,
    /// Work
    Work,
    /// School
    School,
    /// Other
    Other,
    /// Free-text label
    Custom,
}

/// Category of a website.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum WebsiteKind {
    /// Home page
    HomePage,
    /// Home
    Home,
    /// Work
    Work,
    /// School
    School,
    /// Other
    Other,
    /// Free-text label
    Custom,
}

/// Social network of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum ProfileKind {
    /// Twitter
    Twitter,
    /// Facebook
    Facebook,
    /// `LinkedIn`
    LinkedIn,
    /// Flickr
    Flickr,
    /// Myspace
    Myspace,
    /// Sina Weibo
    SinaWeibo,
    /// Other
    Other,
    /// Free-text label
    Custom,
}

/// Category of a contact date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum DateKind {
    /// Anniversary
    Anniversary,
    /// Other
    Other,
    /// Free-text label
    Custom,
}

/// Relation of a related person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum RelatedKind {
    /// Father
    Father,
    /// Mother
    Mother,
    /// Parent
    Parent,
    /// Brother
    Brother,
    /// Sister
    Sister,
    /// Child
    Child,
    /// Friend
    Friend,
    /// Spouse
    Spouse,
    /// Partner
    Partner,
    /// Assistant
    Assistant,
    /// Manager
    Manager,
    /// Other
    Other,
    /// Free-text label
    Custom,
}

/// Result of classifying a field's type flags and label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<C> {
    /// Domain category
    pub category: C,
    /// Whether the field carries the `PREF` flag
    pub is_preferred: bool,
    /// Free-text label, only for the custom category
    pub label: Option<String>,
}

/// Ordered, bidirectional table between type flags and categories of one field kind.
#[derive(Debug, Clone, Copy)]
pub struct MappingTable<F: 'static, C: 'static> {
    entries: &'static [(F, C)],
    labels: &'static [(C, &'static str)],
    base: F,
    custom: C,
    fallback: C,
}

impl<F: 'static, C: 'static> MappingTable<F, C> {
    /// Create a table.
    ///
    /// - `entries`: `(flags, category)` pairs in precedence order
    /// - `labels`: categories carried by a well-known label instead of flags
    /// - `base`: flags always emitted, e.g. `INTERNET` for email
    /// - `custom`: the category of free-text labels
    /// - `fallback`: the category of fields with neither known flags nor a label
    #[must_use]
    pub const fn new(
        entries: &'static [(F, C)],
        labels: &'static [(C, &'static str)],
        base: F,
        custom: C,
        fallback: C,
    ) -> Self {
        Self {
            entries,
            labels,
            base,
            custom,
            fallback,
        }
    }
}

impl<F: TypeFlags, C: Copy + Eq> MappingTable<F, C> {
    /// Category of the first entry whose flags are contained in `flags`, ignoring `PREF`.
    #[must_use]
    pub fn decode(&self, flags: F) -> Option<C> {
        let flags = flags.without(F::PREF);
        self.entries
            .iter()
            .find(|(entry, _)| !entry.is_empty() && flags.contains(*entry))
            .map(|(_, category)| *category)
    }

    /// Flags of the first entry with this category, empty when there is none.
    #[must_use]
    pub fn encode(&self, category: C) -> F {
        self.entries
            .iter()
            .find(|(_, c)| *c == category)
            .map_or(F::EMPTY, |(flags, _)| *flags)
    }

    /// Well-known category of a label, in `_$!<Name>!$_` form or bare, case-insensitive.
    #[must_use]
    pub fn category_for_label(&self, label: &str) -> Option<C> {
        let label = unwrap_label(label);
        self.labels
            .iter()
            .find(|(_, text)| text.eq_ignore_ascii_case(label))
            .map(|(category, _)| *category)
    }

    /// Classify type flags and an optional companion label.
    ///
    /// A table hit wins. Otherwise a well-known label gives its category, any other
    /// non-empty label gives the custom category, and a field without either gets the
    /// fallback category.
    #[must_use]
    pub fn classify(&self, flags: F, label: Option<&str>) -> Classified<C> {
        let is_preferred = flags.contains(F::PREF);
        let classified = |category, label| Classified {
            category,
            is_preferred,
            label,
        };

        if let Some(category) = self.decode(flags) {
            return classified(category, None);
        }
        match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => match self.category_for_label(label) {
                Some(category) => classified(category, None),
                None => classified(self.custom, Some(unwrap_label(label).to_owned())),
            },
            None => classified(self.fallback, None),
        }
    }

    /// Type flags and companion label text for a category.
    ///
    /// The custom category travels only as its label. Without a non-blank label it is
    /// written as the fallback category, which is what a reader would make of it.
    #[must_use]
    pub fn to_wire(
        &self,
        category: C,
        is_preferred: bool,
        label: Option<&str>,
    ) -> (F, Option<String>) {
        let label = label.filter(|l| !l.trim().is_empty());
        if category == self.custom && label.is_none() && self.fallback != self.custom {
            tracing::debug!("custom category without label, writing the fallback category");
            return self.to_wire(self.fallback, is_preferred, None);
        }

        let mut flags = self.base | self.encode(category);
        if is_preferred {
            flags = flags | F::PREF;
        }

        let label = if category == self.custom {
            label.map(str::to_owned)
        } else {
            self.labels
                .iter()
                .find(|(c, _)| *c == category)
                .map(|(_, text)| wrap_label(text))
        };
        (flags, label)
    }

    /// The category of free-text labels.
    #[must_use]
    pub fn custom(&self) -> C {
        self.custom
    }

    /// The category of fields with neither known flags nor a label.
    #[must_use]
    pub fn fallback(&self) -> C {
        self.fallback
    }
}

/// Wrap a well-known label in the `_$!<Name>!$_` form.
#[must_use]
pub fn wrap_label(text: &str) -> String {
    format!("_$!<{text}>!$_")
}

/// Strip the `_$!<Name>!$_` wrapping of a well-known label, if present.
#[must_use]
pub fn unwrap_label(label: &str) -> &str {
    label
        .strip_prefix("_$!<")
        .and_then(|l| l.strip_suffix(">!$_"))
        .unwrap_or(label)
}

/// The mapping tables of every field kind.
#[derive(Debug, Clone, Copy)]
pub struct MappingTables {
    /// `TEL`
    pub phone: MappingTable<PhoneFlags, PhoneKind>,
    /// `ADR`
    pub address: MappingTable<AddressFlags, AddressKind>,
    /// `EMAIL`
    pub email: MappingTable<EmailFlags, EmailKind>,
    /// `URL`
    pub website: MappingTable<WebsiteFlags, WebsiteKind>,
    /// `X-SOCIALPROFILE`
    pub profile: MappingTable<ProfileFlags, ProfileKind>,
    /// `X-ABDATE`
    pub date: MappingTable<DateFlags, DateKind>,
    /// `X-ABRELATEDNAMES`
    pub related: MappingTable<RelatedFlags, RelatedKind>,
}

const PHONE_ENTRIES: &[(PhoneFlags, PhoneKind)] = &[
    (
        PhoneFlags::IPHONE
            .union(PhoneFlags::CELL)
            .union(PhoneFlags::VOICE),
        PhoneKind::IPhone,
    ),
    (PhoneFlags::IPHONE, PhoneKind::IPhone),
    (PhoneFlags::CELL.union(PhoneFlags::VOICE), PhoneKind::Mobile),
    (PhoneFlags::CELL, PhoneKind::Mobile),
    (PhoneFlags::MAIN, PhoneKind::Main),
    (PhoneFlags::HOME.union(PhoneFlags::FAX), PhoneKind::HomeFax),
    (PhoneFlags::WORK.union(PhoneFlags::FAX), PhoneKind::WorkFax),
    (PhoneFlags::OTHER.union(PhoneFlags::FAX), PhoneKind::OtherFax),
    (PhoneFlags::FAX, PhoneKind::OtherFax),
    (PhoneFlags::PAGER, PhoneKind::Pager),
    (PhoneFlags::HOME.union(PhoneFlags::VOICE), PhoneKind::Home),
    (PhoneFlags::HOME, PhoneKind::Home),
    (PhoneFlags::WORK.union(PhoneFlags::VOICE), PhoneKind::Work),
    (PhoneFlags::WORK, PhoneKind::Work),
    (PhoneFlags::OTHER.union(PhoneFlags::VOICE), PhoneKind::Other),
    (PhoneFlags::OTHER, PhoneKind::Other),
    (PhoneFlags::VOICE, PhoneKind::Other),
];

const ADDRESS_ENTRIES: &[(AddressFlags, AddressKind)] = &[
    (AddressFlags::HOME, AddressKind::Home),
    (AddressFlags::WORK, AddressKind::Work),
];

const ADDRESS_LABELS: &[(AddressKind, &str)] =
    &[(AddressKind::School, "School"), (AddressKind::Other, "Other")];

const EMAIL_ENTRIES: &[(EmailFlags, EmailKind)] = &[
    (EmailFlags::HOME, EmailKind::Home),
    (EmailFlags::WORK, EmailKind::Work),
];

const EMAIL_LABELS: &[(EmailKind, &str)] =
    &[(EmailKind::School, "School"), (EmailKind::Other, "Other")];

const WEBSITE_ENTRIES: &[(WebsiteFlags, WebsiteKind)] = &[
    (WebsiteFlags::HOME, WebsiteKind::Home),
    (WebsiteFlags::WORK, WebsiteKind::Work),
];

const WEBSITE_LABELS: &[(WebsiteKind, &str)] = &[
    (WebsiteKind::HomePage, "HomePage"),
    (WebsiteKind::School, "School"),
    (WebsiteKind::Other, "Other"),
];

const PROFILE_ENTRIES: &[(ProfileFlags, ProfileKind)] = &[
    (ProfileFlags::TWITTER, ProfileKind::Twitter),
    (ProfileFlags::FACEBOOK, ProfileKind::Facebook),
    (ProfileFlags::LINKEDIN, ProfileKind::LinkedIn),
    (ProfileFlags::FLICKR, ProfileKind::Flickr),
    (ProfileFlags::MYSPACE, ProfileKind::Myspace),
    (ProfileFlags::SINAWEIBO, ProfileKind::SinaWeibo),
];

const DATE_LABELS: &[(DateKind, &str)] = &[
    (DateKind::Anniversary, "Anniversary"),
    (DateKind::Other, "Other"),
];

const RELATED_LABELS: &[(RelatedKind, &str)] = &[
    (RelatedKind::Father, "Father"),
    (RelatedKind::Mother, "Mother"),
    (RelatedKind::Parent, "Parent"),
    (RelatedKind::Brother, "Brother"),
    (RelatedKind::Sister, "Sister"),
    (RelatedKind::Child, "Child"),
    (RelatedKind::Friend, "Friend"),
    (RelatedKind::Spouse, "Spouse"),
    (RelatedKind::Partner, "Partner"),
    (RelatedKind::Assistant, "Assistant"),
    (RelatedKind::Manager, "Manager"),
    (RelatedKind::Other, "Other"),
];

impl MappingTables {
    /// The standard tables, compatible with Apple Contacts and iCloud.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            phone: MappingTable::new(
                PHONE_ENTRIES,
                &[],
                PhoneFlags::EMPTY,
                PhoneKind::Custom,
                PhoneKind::Other,
            ),
            address: MappingTable::new(
                ADDRESS_ENTRIES,
                ADDRESS_LABELS,
                AddressFlags::EMPTY,
                AddressKind::Custom,
                AddressKind::Other,
            ),
            email: MappingTable::new(
                EMAIL_ENTRIES,
                EMAIL_LABELS,
                EmailFlags::INTERNET,
                EmailKind::Custom,
                EmailKind::Other,
            ),
            website: MappingTable::new(
                WEBSITE_ENTRIES,
                WEBSITE_LABELS,
                WebsiteFlags::EMPTY,
                WebsiteKind::Custom,
                WebsiteKind::Other,
            ),
            profile: MappingTable::new(
                PROFILE_ENTRIES,
                &[],
                ProfileFlags::EMPTY,
                ProfileKind::Custom,
                ProfileKind::Other,
            ),
            date: MappingTable::new(
                &[],
                DATE_LABELS,
                DateFlags::EMPTY,
                DateKind::Custom,
                DateKind::Other,
            ),
            related: MappingTable::new(
                &[],
                RELATED_LABELS,
                RelatedFlags::EMPTY,
                RelatedKind::Custom,
                RelatedKind::Other,
            ),
        }
    }
}

impl Default for MappingTables {
    fn default() -> Self {
        Self::standard()
    }
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::Deref;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::DavError;

macro_rules! opaque_string {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "` from a string.")]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

opaque_string! {
    /// Resource href (path).
    ///
    /// A `Href` is the path of a collection or object resource on the server, such as
    /// `/calendars/user/work/` or `/calendars/user/work/event1.ics`. Servers may also
    /// answer with absolute URLs.
    Href
}

opaque_string! {
    /// Entity tag of one resource revision.
    ///
    /// Guards conditional writes: `If-Match` on update and delete.
    ETag
}

opaque_string! {
    /// Revision of a whole collection, for incremental `sync-collection` reports.
    SyncToken
}

impl Href {
    /// Path part of the href; absolute URLs are reduced to their path.
    #[must_use]
    pub fn path(&self) -> &str {
        if self.0.starts_with("http://") || self.0.starts_with("https://") {
            let after_scheme = self.0.find("://").map_or(0, |i| i + 3);
            return self
                .0
                .get(after_scheme..)
                .and_then(|rest| rest.find('/').and_then(|i| rest.get(i..)))
                .unwrap_or("/");
        }
        &self.0
    }

    /// Last non-empty path segment.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path().split('/').rfind(|s| !s.is_empty())
    }

    /// Extension of the last path segment, e.g. `ics` or `vcf`.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        if self.path().ends_with('/') {
            return None;
        }
        let name = self.file_name()?;
        name.rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    /// Member id derived from the href: the last segment without its extension.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        let name = self.file_name().unwrap_or_default();
        match self.extension() {
            Some(ext) => name.strip_suffix(ext).and_then(|n| n.strip_suffix('.')).unwrap_or(name),
            None => name,
        }
    }

    /// Whether two hrefs name the same resource, ignoring host and trailing slash.
    #[must_use]
    pub fn same_resource(&self, other: &Self) -> bool {
        self.path().trim_end_matches('/') == other.path().trim_end_matches('/')
    }

    /// Whether `other` is this resource or lies below it, at a path segment boundary.
    #[must_use]
    pub fn encloses(&self, other: &Self) -> bool {
        let base = self.path().trim_end_matches('/');
        let path = other.path().trim_end_matches('/');
        path.strip_prefix(base)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Href of a member named `name` inside this collection.
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        let base = self.0.trim_end_matches('/');
        Self(format!("{base}/{}", name.trim_start_matches('/')))
    }

    /// Absolute URL of the href against the server base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DavError::Config`] if the base URL or the href cannot be parsed.
    pub fn to_url(&self, base_url: &str) -> Result<Url, DavError> {
        let base = Url::parse(base_url)
            .map_err(|e| DavError::Config(format!("Invalid base URL {base_url}: {e}")))?;
        base.join(&self.0)
            .map_err(|e| DavError::Config(format!("Invalid href {}: {e}", self.0)))
    }
}

/// An object resource with its server metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource<T> {
    /// The href of the resource.
    pub href: Href,
    /// The entity tag of the resource, when the server reported one.
    pub etag: Option<ETag>,
    /// The materialized object.
    pub value: T,
}

impl<T> Resource<T> {
    /// Creates a new `Resource`.
    #[must_use]
    pub const fn new(href: Href, etag: Option<ETag>, value: T) -> Self {
        Self { href, etag, value }
    }

    /// Member id derived from the href.
    #[must_use]
    pub fn id(&self) -> &str {
        self.href.resource_id()
    }
}

/// Calendar collection metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarInfo {
    /// The href of the calendar collection.
    pub href: Href,
    /// The display name of the calendar.
    pub display_name: Option<String>,
    /// The description of the calendar.
    pub description: Option<String>,
    /// Display color, e.g. `#FF2968FF`.
    pub color: Option<String>,
    /// Sort order among the user's calendars.
    pub order: Option<i32>,
    /// Supported component types (VEVENT, VTODO, etc.).
    pub supported_components: Vec<String>,
    /// Default time zone as a `VTIMEZONE` object.
    pub timezone: Option<String>,
    /// The collection tag (`CTag`) for change detection.
    pub ctag: Option<String>,
    /// The current sync token.
    pub sync_token: Option<SyncToken>,
}

impl CalendarInfo {
    /// Whether the calendar accepts a component type; an empty set accepts everything.
    #[must_use]
    pub fn supports(&self, component: &str) -> bool {
        self.supported_components.is_empty()
            || self
                .supported_components
                .iter()
                .any(|c| c.eq_ignore_ascii_case(component))
    }
}

/// Address book collection metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBookInfo {
    /// The href of the address book collection.
    pub href: Href,
    /// The display name of the address book.
    pub display_name: Option<String>,
    /// The description of the address book.
    pub description: Option<String>,
    /// The collection tag (`CTag`) for change detection.
    pub ctag: Option<String>,
    /// The current sync token.
    pub sync_token: Option<SyncToken>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_parts() {
        let href = Href::from("/calendars/jane/work/event%201.ics");
        assert_eq!(href.file_name(), Some("event%201.ics"));
        assert_eq!(href.extension(), Some("ics"));
        assert_eq!(href.resource_id(), "event%201");

        let collection = Href::from("/calendars/jane/work/");
        assert_eq!(collection.file_name(), Some("work"));
        assert_eq!(collection.extension(), None);
        assert_eq!(collection.resource_id(), "work");
    }

    #[test]
    fn absolute_hrefs_compare_by_path() {
        let absolute = Href::from("https://dav.example.com/calendars/jane/work/");
        assert_eq!(absolute.path(), "/calendars/jane/work/");
        assert!(absolute.same_resource(&Href::from("/calendars/jane/work")));
        assert!(!absolute.same_resource(&Href::from("/calendars/jane/")));
        assert_eq!(Href::from("https://dav.example.com").path(), "/");
    }

    #[test]
    fn encloses_at_segment_boundaries() {
        let home = Href::from("/addressbooks/jane/");
        assert!(home.encloses(&Href::from("/addressbooks/jane/contacts/")));
        assert!(home.encloses(&Href::from("https://dav.example.com/addressbooks/jane")));
        assert!(Href::from("/").encloses(&home));
        assert!(!home.encloses(&Href::from("/addressbooks/janet/")));
        assert!(!Href::from("/book/c1001").encloses(&Href::from("/book/")));
    }

    #[test]
    fn join_and_url() {
        let collection = Href::from("/addressbooks/jane/contacts/");
        let member = collection.join("abc.vcf");
        assert_eq!(member.as_str(), "/addressbooks/jane/contacts/abc.vcf");
        let url = member.to_url("https://dav.example.com/base/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://dav.example.com/addressbooks/jane/contacts/abc.vcf"
        );
        assert!(member.to_url("not a url").is_err());
    }

    #[test]
    fn calendar_supports_components() {
        let mut info = CalendarInfo::default();
        assert!(info.supports("VTODO"));
        info.supported_components = vec!["VEVENT".into()];
        assert!(info.supports("vevent"));
        assert!(!info.supports("VTODO"));
    }
}

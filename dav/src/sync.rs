// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Synchronization state kept by the caller between sync cycles.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::convert::SyncDiff;
use crate::types::{ETag, Href, SyncToken};

/// Known members of one collection and the token of the last sync.
///
/// Serializable so the caller can persist it; where it is stored is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    /// Collection token of the last sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<SyncToken>,
    /// Last seen `ETag` per member href.
    #[serde(default)]
    pub etags: BTreeMap<Href, ETag>,
}

/// Members that changed between a [`SyncState`] and a remote listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    /// Members not known before.
    pub added: Vec<Href>,
    /// Known members whose `ETag` changed.
    pub modified: Vec<Href>,
    /// Known members missing from the listing.
    pub deleted: Vec<Href>,
}

impl Changes {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Members whose data must be fetched.
    pub fn to_fetch(&self) -> impl Iterator<Item = &Href> {
        self.added.iter().chain(&self.modified)
    }
}

impl SyncState {
    /// Creates an empty state; the first sync reports every member as added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no member is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.etags.is_empty()
    }

    /// Compares the state against a full listing of the collection's members.
    ///
    /// Hrefs are compared by path, so a server answering with absolute URLs matches
    /// state recorded from relative hrefs.
    pub fn changes<'a>(&self, listing: impl IntoIterator<Item = (&'a Href, &'a ETag)>) -> Changes {
        let known: BTreeMap<&str, &ETag> =
            self.etags.iter().map(|(href, etag)| (path_key(href), etag)).collect();
        let mut changes = Changes::default();
        let mut seen = BTreeSet::new();

        for (href, etag) in listing {
            let key = path_key(href);
            seen.insert(key);
            match known.get(key) {
                None => changes.added.push(href.clone()),
                Some(&current) if current != etag => changes.modified.push(href.clone()),
                Some(_) => {}
            }
        }

        changes.deleted = self
            .etags
            .keys()
            .filter(|href| !seen.contains(path_key(href)))
            .cloned()
            .collect();

        tracing::debug!(
            added = changes.added.len(),
            modified = changes.modified.len(),
            deleted = changes.deleted.len(),
            "compared member listing"
        );
        changes
    }

    /// Records the current `ETag` of a member.
    pub fn record(&mut self, href: Href, etag: ETag) {
        self.forget(&href);
        self.etags.insert(href, etag);
    }

    /// Drops a member; returns its last `ETag`.
    pub fn forget(&mut self, href: &Href) -> Option<ETag> {
        let key = self.etags.keys().find(|k| k.same_resource(href)).cloned()?;
        self.etags.remove(&key)
    }

    /// Applies the result of a `sync-collection` report and moves to its token.
    ///
    /// Changed members without an `ETag` are forgotten so that the next listing
    /// reports them again.
    pub fn apply(&mut self, diff: &SyncDiff) {
        for item in &diff.items {
            match (&item.etag, item.deleted) {
                (Some(etag), false) => self.record(item.href.clone(), etag.clone()),
                _ => {
                    self.forget(&item.href);
                }
            }
        }
        if diff.token.is_some() {
            self.token.clone_from(&diff.token);
        }
    }

}

/// Comparison key of an href: its path without trailing slash.
fn path_key(href: &Href) -> &str {
    href.path().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::SyncItem;

    fn state(entries: &[(&str, &str)]) -> SyncState {
        let mut state = SyncState::new();
        for (href, etag) in entries {
            state.record(Href::from(*href), ETag::from(*etag));
        }
        state
    }

    #[test]
    fn detects_added_modified_and_deleted() {
        let state = state(&[("/c/a.vcf", "1"), ("/c/b.vcf", "1"), ("/c/c.vcf", "1")]);
        let listing = [
            (Href::from("/c/a.vcf"), ETag::from("1")),
            (Href::from("https://dav.example.com/c/b.vcf"), ETag::from("2")),
            (Href::from("/c/d.vcf"), ETag::from("1")),
        ];
        let changes = state.changes(listing.iter().map(|(h, e)| (h, e)));
        assert_eq!(changes.added, [Href::from("/c/d.vcf")]);
        assert_eq!(changes.modified, [Href::from("https://dav.example.com/c/b.vcf")]);
        assert_eq!(changes.deleted, [Href::from("/c/c.vcf")]);
        assert_eq!(changes.to_fetch().count(), 2);
    }

    #[test]
    fn compares_large_listings() {
        let mut state = SyncState::new();
        for i in 0..5_000 {
            state.etags.insert(Href::from(format!("/c/{i}.vcf")), ETag::from("1"));
        }
        let listing: Vec<_> = (1..5_000)
            .map(|i| {
                let etag = if i == 7 { "2" } else { "1" };
                (Href::from(format!("/c/{i}.vcf")), ETag::from(etag))
            })
            .chain([(Href::from("/c/new.vcf"), ETag::from("1"))])
            .collect();

        let changes = state.changes(listing.iter().map(|(h, e)| (h, e)));
        assert_eq!(changes.added, [Href::from("/c/new.vcf")]);
        assert_eq!(changes.modified, [Href::from("/c/7.vcf")]);
        assert_eq!(changes.deleted, [Href::from("/c/0.vcf")]);
    }

    #[test]
    fn unchanged_listing_is_empty() {
        let state = state(&[("/c/a.vcf", "1")]);
        let listing = [(Href::from("/c/a.vcf"), ETag::from("1"))];
        assert!(state.changes(listing.iter().map(|(h, e)| (h, e))).is_empty());
    }

    #[test]
    fn apply_sync_diff() {
        let mut state = state(&[("/c/a.ics", "1"), ("/c/b.ics", "1")]);
        let diff = SyncDiff {
            collection: Href::from("/c/"),
            token: Some(SyncToken::from("t2")),
            items: vec![
                SyncItem {
                    href: Href::from("/c/a.ics"),
                    id: "a".into(),
                    etag: Some(ETag::from("2")),
                    deleted: false,
                },
                SyncItem {
                    href: Href::from("/c/b.ics"),
                    id: "b".into(),
                    etag: None,
                    deleted: true,
                },
            ],
            failures: Vec::new(),
        };
        state.apply(&diff);
        assert_eq!(state.token, Some(SyncToken::from("t2")));
        assert_eq!(state.etags.len(), 1);
        assert_eq!(state.etags.get(&Href::from("/c/a.ics")), Some(&ETag::from("2")));
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = state(&[("/c/a.ics", "\"x\"")]);
        state.token = Some(SyncToken::from("t1"));
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"token":"t1","etags":{"/c/a.ics":"\"x\""}}"#);
        assert_eq!(serde_json::from_str::<SyncState>(&json).unwrap(), state);
    }
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV`/`CardDAV` synchronization: `WebDAV` XML bodies, multistatus parsing, conversion
//! into typed collections with sync semantics, and a client over a pluggable transport.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool,
    clippy::module_name_repetitions
)]

mod client;
mod config;
pub mod convert;
mod error;
mod http;
mod request;
mod response;
mod sync;
mod transport;
mod types;
mod xml;

pub use crate::client::{DavClient, Discovery, member_href};
pub use crate::config::{AuthMethod, DavConfig};
pub use crate::convert::{CollectionList, ItemFailure, ItemList, SyncDiff, SyncItem};
pub use crate::error::{DavError, ItemError};
pub use crate::http::HttpTransport;
pub use crate::request::{
    AddressbookQueryRequest, CalendarQueryRequest, CollectionProps, FilterTest, MatchType,
    MkCalendarRequest, MultiGetRequest, ObjectKind, Prop, PropFilter, PropFindRequest,
    PropPatchRequest, SyncCollectionRequest, SyncLevel, TextMatch, TimeRange,
};
pub use crate::response::{MultiStatus, Properties, Response, ResourceType};
pub use crate::sync::{Changes, SyncState};
pub use crate::transport::{DavMethod, DavReply, DavRequest, Depth, Transport};
pub use crate::types::{AddressBookInfo, CalendarInfo, ETag, Href, Resource, SyncToken};
pub use crate::xml::{Namespace, ns};

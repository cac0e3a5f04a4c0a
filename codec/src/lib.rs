// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Read and write vCard and iCalendar objects for `CalDAV`/`CardDAV` synchronization.
//!
//! ```text
//! Text → Line Codec → Components → PropertyList → Field Codecs → Card / Calendar
//! ```
//!
//! All operations are pure functions of their input and an explicit [`CodecContext`],
//! which carries the type-flag mapping tables and the field codec registry.

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

mod context;
mod error;
pub mod field;
pub mod flags;
pub mod icalendar;
pub mod keyword;
pub mod line;
pub mod mapping;
mod property;
pub mod reader;
pub mod value;
pub mod vcard;

pub use crate::context::CodecContext;
pub use crate::error::{CodecError, ParseWarning};
pub use crate::field::{
    Address, ContactDate, ContactField, Email, FieldCodec, FieldKind, FieldRegistry, Phone, Photo,
    PhotoData, Profile, RelatedPerson, Website,
};
pub use crate::icalendar::{Alarm, Calendar, CalendarComponent, Event, Reminder, ReminderStatus};
pub use crate::mapping::{
    AddressKind, Classified, DateKind, EmailKind, MappingTable, MappingTables, PhoneKind,
    ProfileKind, RelatedKind, WebsiteKind,
};
pub use crate::property::{Parameters, Property, PropertyList, PropertyValue};
pub use crate::reader::{Component, ComponentKind, Parsed};
pub use crate::value::CalDateTime;
pub use crate::vcard::{Card, Contact, ContactGroup, ObjectMeta, StructuredName};

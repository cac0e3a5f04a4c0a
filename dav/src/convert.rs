// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Conversion of parsed multistatus documents into typed collections.
//!
//! Every conversion first identifies the response describing the collection itself and
//! treats all other responses as members. Members carrying object data are materialized
//! through the codec; a member that fails is reported next to the others and never fails
//! the whole list.

use davsync_codec::{
    Calendar, Card, CodecContext, Contact, ContactGroup, Event, ParseWarning, Reminder,
};

use crate::error::{DavError, ItemError};
use crate::response::{MultiStatus, Response};
use crate::types::{AddressBookInfo, CalendarInfo, ETag, Href, Resource, SyncToken};

/// A member that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// The href of the member.
    pub href: Href,
    /// Why the conversion failed.
    pub error: ItemError,
}

/// Typed members of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList<T> {
    /// The href of the collection.
    pub collection: Href,
    /// Continuation token of the collection: its sync token, `CTag` or `ETag`.
    pub token: Option<SyncToken>,
    /// Converted members, tagged with their href and `ETag`.
    pub items: Vec<Resource<T>>,
    /// Members that could not be converted.
    pub failures: Vec<ItemFailure>,
    /// Recoverable problems found while reading member data.
    pub warnings: Vec<(Href, ParseWarning)>,
}

impl<T> ItemList<T> {
    fn empty(collection: Href, token: Option<SyncToken>) -> Self {
        Self {
            collection,
            token,
            items: Vec::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn fail(&mut self, href: &Href, error: ItemError) {
        tracing::warn!(href = %href, %error, "skipping collection member");
        self.failures.push(ItemFailure {
            href: href.clone(),
            error,
        });
    }

    /// The materialized values, without server metadata.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|r| &r.value)
    }

    /// Number of converted members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no member was converted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Collections found under a home set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionList<T> {
    /// The href of the home collection.
    pub home: Href,
    /// Continuation token of the home collection.
    pub token: Option<SyncToken>,
    /// The collections.
    pub collections: Vec<T>,
}

/// One member of a `sync-collection` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncItem {
    /// The href of the member.
    pub href: Href,
    /// Member id derived from the href.
    pub id: String,
    /// The current `ETag`; absent for deleted members.
    pub etag: Option<ETag>,
    /// Whether the member was removed since the previous token.
    pub deleted: bool,
}

/// Changes of a collection since a sync token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncDiff {
    /// The href of the collection.
    pub collection: Href,
    /// Token to pass to the next sync.
    pub token: Option<SyncToken>,
    /// Changed and deleted members.
    pub items: Vec<SyncItem>,
    /// Members reported with an unexpected status.
    pub failures: Vec<ItemFailure>,
}

impl SyncDiff {
    /// Members added or modified.
    pub fn changed(&self) -> impl Iterator<Item = &SyncItem> {
        self.items.iter().filter(|i| !i.deleted)
    }

    /// Members removed.
    pub fn deleted(&self) -> impl Iterator<Item = &SyncItem> {
        self.items.iter().filter(|i| i.deleted)
    }
}

/// Index of the response describing the collection at `href`.
///
/// The response naming `href` wins. Without one, the first successful response that is an
/// ancestor of `href` or carries a collection resource type is taken; a member href is never
/// guessed to be the container.
#[must_use]
pub fn find_collection(multistatus: &MultiStatus, href: &Href) -> Option<usize> {
    let responses = &multistatus.responses;
    responses
        .iter()
        .position(|r| r.href.same_resource(href))
        .or_else(|| {
            responses
                .iter()
                .position(|r| r.is_collection() || (r.is_success() && r.href.encloses(href)))
        })
}

fn split_collection<'a>(
    multistatus: &'a MultiStatus,
    href: &Href,
) -> Result<(&'a Response, impl Iterator<Item = &'a Response>), DavError> {
    let index = find_collection(multistatus, href)
        .ok_or_else(|| DavError::MissingCollectionResponse(href.clone()))?;
    let collection = multistatus
        .responses
        .get(index)
        .ok_or_else(|| DavError::MissingCollectionResponse(href.clone()))?;
    let members = multistatus
        .responses
        .iter()
        .enumerate()
        .filter(move |(i, _)| *i != index)
        .map(|(_, r)| r);
    Ok((collection, members))
}

/// Calendars under a calendar home.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if no response describes the home.
pub fn calendars(
    multistatus: &MultiStatus,
    home: &Href,
) -> Result<CollectionList<CalendarInfo>, DavError> {
    let (collection, members) = split_collection(multistatus, home)?;
    let collections = members
        .filter(|r| r.is_success() && r.props.resource_type.calendar)
        .map(|r| {
            let props = &r.props;
            CalendarInfo {
                href: r.href.clone(),
                display_name: props.display_name.clone(),
                description: props.calendar_description.clone(),
                color: props.calendar_color.clone(),
                order: props.calendar_order,
                supported_components: props.supported_components.clone(),
                timezone: props.calendar_timezone.clone(),
                ctag: props.ctag.clone(),
                sync_token: props.sync_token.clone(),
            }
        })
        .collect();

    Ok(CollectionList {
        home: collection.href.clone(),
        token: collection.props.collection_token(),
        collections,
    })
}

/// Address books under an address book home.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if no response describes the home.
pub fn address_books(
    multistatus: &MultiStatus,
    home: &Href,
) -> Result<CollectionList<AddressBookInfo>, DavError> {
    let (collection, members) = split_collection(multistatus, home)?;
    let collections = members
        .filter(|r| r.is_success() && r.props.resource_type.addressbook)
        .map(|r| AddressBookInfo {
            href: r.href.clone(),
            display_name: r.props.display_name.clone(),
            description: r.props.addressbook_description.clone(),
            ctag: r.props.ctag.clone(),
            sync_token: r.props.sync_token.clone(),
        })
        .collect();

    Ok(CollectionList {
        home: collection.href.clone(),
        token: collection.props.collection_token(),
        collections,
    })
}

/// Members of a collection with their data, or the reason they have none.
fn data_members<'a>(
    multistatus: &'a MultiStatus,
    href: &Href,
    data: fn(&Response) -> Option<&str>,
) -> Result<(Response, Vec<Result<(&'a Response, &'a str), ItemFailure>>), DavError> {
    let (collection, members) = split_collection(multistatus, href)?;
    let members = members
        .filter(|r| !r.is_deleted())
        .map(|r| {
            let failure = |error| ItemFailure {
                href: r.href.clone(),
                error,
            };
            if !r.is_success() {
                return Err(failure(ItemError::Status(r.status())));
            }
            data(r).map(|text| (r, text)).ok_or_else(|| failure(ItemError::NoData))
        })
        .collect();
    Ok((collection.clone(), members))
}

fn calendar_items<T>(
    multistatus: &MultiStatus,
    href: &Href,
    pick: fn(Calendar) -> Vec<T>,
) -> Result<ItemList<T>, DavError> {
    let (collection, members) =
        data_members(multistatus, href, |r| r.props.calendar_data.as_deref())?;
    let mut list = ItemList::empty(collection.href, collection.props.collection_token());

    for member in members {
        let (response, text) = match member {
            Ok(member) => member,
            Err(failure) => {
                list.fail(&failure.href, failure.error);
                continue;
            }
        };
        match Calendar::parse(text) {
            Ok(parsed) => {
                list.warnings
                    .extend(parsed.warnings.into_iter().map(|w| (response.href.clone(), w)));
                for value in pick(parsed.value) {
                    list.items.push(Resource::new(
                        response.href.clone(),
                        response.etag().cloned(),
                        value,
                    ));
                }
            }
            Err(error) => list.fail(&response.href, error.into()),
        }
    }
    Ok(list)
}

fn card_items<T>(
    multistatus: &MultiStatus,
    href: &Href,
    ctx: &CodecContext,
    pick: fn(Card) -> Option<T>,
) -> Result<ItemList<T>, DavError> {
    let (collection, members) =
        data_members(multistatus, href, |r| r.props.address_data.as_deref())?;
    let mut list = ItemList::empty(collection.href, collection.props.collection_token());

    for member in members {
        let (response, text) = match member {
            Ok(member) => member,
            Err(failure) => {
                list.fail(&failure.href, failure.error);
                continue;
            }
        };
        match Card::parse(text, ctx) {
            Ok(parsed) => {
                list.warnings
                    .extend(parsed.warnings.into_iter().map(|w| (response.href.clone(), w)));
                if let Some(value) = pick(parsed.value) {
                    list.items.push(Resource::new(
                        response.href.clone(),
                        response.etag().cloned(),
                        value,
                    ));
                }
            }
            Err(error) => list.fail(&response.href, error.into()),
        }
    }
    Ok(list)
}

/// Whole calendar objects of a calendar collection.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if no response describes the collection.
pub fn calendar_objects(
    multistatus: &MultiStatus,
    collection: &Href,
) -> Result<ItemList<Calendar>, DavError> {
    calendar_items(multistatus, collection, |calendar| vec![calendar])
}

/// Events of a calendar collection; a resource holding several events yields each.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if no response describes the collection.
pub fn events(
    multistatus: &MultiStatus,
    collection: &Href,
) -> Result<ItemList<Event>, DavError> {
    calendar_items(multistatus, collection, |calendar| {
        calendar.events().cloned().collect()
    })
}

/// Reminders of a calendar collection.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if no response describes the collection.
pub fn reminders(
    multistatus: &MultiStatus,
    collection: &Href,
) -> Result<ItemList<Reminder>, DavError> {
    calendar_items(multistatus, collection, |calendar| {
        calendar.reminders().cloned().collect()
    })
}

/// Cards of an address book, contacts and groups alike.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if no response describes the collection.
pub fn cards(
    multistatus: &MultiStatus,
    collection: &Href,
    ctx: &CodecContext,
) -> Result<ItemList<Card>, DavError> {
    card_items(multistatus, collection, ctx, Some)
}

/// Contacts of an address book; groups are skipped.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if no response describes the collection.
pub fn contacts(
    multistatus: &MultiStatus,
    collection: &Href,
    ctx: &CodecContext,
) -> Result<ItemList<Contact>, DavError> {
    card_items(multistatus, collection, ctx, |card| match card {
        Card::Contact(contact) => Some(contact),
        Card::Group(_) => None,
    })
}

/// Contact groups of an address book; contacts are skipped.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if no response describes the collection.
pub fn contact_groups(
    multistatus: &MultiStatus,
    collection: &Href,
    ctx: &CodecContext,
) -> Result<ItemList<ContactGroup>, DavError> {
    card_items(multistatus, collection, ctx, |card| match card {
        Card::Group(group) => Some(group),
        Card::Contact(_) => None,
    })
}

/// Changes reported by a `sync-collection` report.
///
/// The token is the multistatus-level sync token, else the collection response's. When no
/// response describes the collection, a multistatus-level token is enough and every
/// response is a member.
///
/// # Errors
///
/// Returns [`DavError::MissingCollectionResponse`] if neither a collection response nor
/// a multistatus-level sync token is present.
pub fn sync_diff(multistatus: &MultiStatus, collection: &Href) -> Result<SyncDiff, DavError> {
    let (token, members): (_, Box<dyn Iterator<Item = &Response>>) =
        match split_collection(multistatus, collection) {
            Ok((container, members)) => (
                multistatus
                    .sync_token
                    .clone()
                    .or_else(|| container.props.collection_token()),
                Box::new(members),
            ),
            Err(_) if multistatus.sync_token.is_some() => (
                multistatus.sync_token.clone(),
                Box::new(multistatus.responses.iter()),
            ),
            Err(error) => return Err(error),
        };

    let mut diff = SyncDiff {
        collection: collection.clone(),
        token,
        items: Vec::new(),
        failures: Vec::new(),
    };
    for response in members {
        let deleted = response.is_deleted();
        if !deleted && !response.is_success() {
            tracing::warn!(href = %response.href, status = response.status(), "unexpected member status");
            diff.failures.push(ItemFailure {
                href: response.href.clone(),
                error: ItemError::Status(response.status()),
            });
            continue;
        }
        diff.items.push(SyncItem {
            href: response.href.clone(),
            id: response.href.resource_id().to_string(),
            etag: if deleted { None } else { response.etag().cloned() },
            deleted,
        });
    }
    Ok(diff)
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV`/`CardDAV` client for collection and object operations.

use davsync_codec::{Calendar, Card, CodecContext, Contact, ContactGroup, Event, Reminder};

use crate::config::DavConfig;
use crate::convert::{self, CollectionList, ItemList, SyncDiff};
use crate::error::DavError;
use crate::http::HttpTransport;
use crate::request::{
    AddressbookQueryRequest, CalendarQueryRequest, CollectionProps, FilterTest, MkCalendarRequest,
    MultiGetRequest, ObjectKind, Prop, PropFilter, PropFindRequest, PropPatchRequest,
    SyncCollectionRequest, TextMatch, TimeRange,
};
use crate::response::MultiStatus;
use crate::transport::{DavMethod, DavReply, DavRequest, Depth, Transport};
use crate::types::{AddressBookInfo, CalendarInfo, ETag, Href, Resource, SyncToken};

/// vCard property marking a card as a group (Apple address book servers).
const KIND_PROPERTY: &str = "X-ADDRESSBOOKSERVER-KIND";

/// Properties identifying a collection and its revision.
const COLLECTION_TOKEN_PROPS: [Prop; 4] =
    [Prop::ResourceType, Prop::GetCTag, Prop::SyncToken, Prop::GetETag];

/// `CalDAV`/`CardDAV` client.
///
/// Requests go through a [`Transport`]; responses are converted into typed collections
/// with the codec configured by a [`CodecContext`].
///
/// # Example
///
/// ```ignore
/// use davsync_dav::{AuthMethod, DavClient, DavConfig, Href};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DavConfig {
///     base_url: "https://dav.example.com".to_string(),
///     auth: AuthMethod::Basic {
///         username: "user".to_string(),
///         password: "pass".to_string(),
///     },
///     ..Default::default()
/// };
///
/// let client = DavClient::new(config)?;
/// let discovery = client.discover().await?;
/// if let Some(home) = &discovery.calendar_home {
///     let calendars = client.list_calendars(home).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DavClient<T = HttpTransport> {
    transport: T,
    config: DavConfig,
    ctx: CodecContext,
}

/// What the server told about itself and the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Compliance classes from the `DAV` header.
    pub capabilities: Vec<String>,
    /// The principal of the authenticated user.
    pub principal: Option<Href>,
    /// Home of the user's calendars.
    pub calendar_home: Option<Href>,
    /// Home of the user's address books.
    pub addressbook_home: Option<Href>,
}

impl Discovery {
    /// Whether the server announces `calendar-access`.
    #[must_use]
    pub fn supports_calendars(&self) -> bool {
        self.capabilities.iter().any(|c| c == "calendar-access")
    }

    /// Whether the server announces `addressbook`.
    #[must_use]
    pub fn supports_contacts(&self) -> bool {
        self.capabilities.iter().any(|c| c == "addressbook")
    }
}

impl DavClient<HttpTransport> {
    /// Creates a new client over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or HTTP client initialization fails.
    pub fn new(config: DavConfig) -> Result<Self, DavError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> DavClient<T> {
    /// Creates a client over the given transport.
    #[must_use]
    pub fn with_transport(config: DavConfig, transport: T) -> Self {
        Self {
            transport,
            config,
            ctx: CodecContext::default(),
        }
    }

    /// Replaces the codec context used for reading and writing objects.
    #[must_use]
    pub fn with_context(mut self, ctx: CodecContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &DavConfig {
        &self.config
    }

    /// The transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The codec context.
    #[must_use]
    pub fn context(&self) -> &CodecContext {
        &self.ctx
    }

    /// Discovers server capabilities, the current principal and its home sets.
    ///
    /// Homes the server does not report fall back to the configured ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails.
    #[tracing::instrument(skip(self))]
    pub async fn discover(&self) -> Result<Discovery, DavError> {
        let start = self
            .config
            .calendar_home
            .as_deref()
            .or(self.config.addressbook_home.as_deref())
            .map_or_else(|| Href::from("/"), Href::from);

        let reply = self
            .send(DavRequest::new(DavMethod::Options, start.clone()))
            .await?;
        let capabilities = reply
            .header("DAV")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();

        let props = [
            Prop::CurrentUserPrincipal,
            Prop::CalendarHomeSet,
            Prop::AddressbookHomeSet,
        ];
        let multistatus = self.propfind(&start, Depth::Zero, &props).await?;
        let mut discovery = Discovery {
            capabilities,
            ..Discovery::default()
        };
        absorb_homes(&mut discovery, &multistatus);

        if let Some(principal) = discovery.principal.clone()
            && (discovery.calendar_home.is_none() || discovery.addressbook_home.is_none())
        {
            let multistatus = self
                .propfind(&principal, Depth::Zero, &props[1..])
                .await?;
            absorb_homes(&mut discovery, &multistatus);
        }

        if discovery.calendar_home.is_none() {
            discovery.calendar_home = self.config.calendar_home.as_deref().map(Href::from);
        }
        if discovery.addressbook_home.is_none() {
            discovery.addressbook_home = self.config.addressbook_home.as_deref().map(Href::from);
        }
        tracing::debug!(?discovery, "discovered server");
        Ok(discovery)
    }

    /// Lists the calendars under a calendar home.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no home collection.
    pub async fn list_calendars(
        &self,
        home: &Href,
    ) -> Result<CollectionList<CalendarInfo>, DavError> {
        let multistatus = self
            .propfind(home, Depth::One, &Prop::CALENDAR_COLLECTION)
            .await?;
        convert::calendars(&multistatus, home)
    }

    /// Lists the address books under an address book home.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no home collection.
    pub async fn list_address_books(
        &self,
        home: &Href,
    ) -> Result<CollectionList<AddressBookInfo>, DavError> {
        let multistatus = self
            .propfind(home, Depth::One, &Prop::ADDRESSBOOK_COLLECTION)
            .await?;
        convert::address_books(&multistatus, home)
    }

    /// Creates a calendar collection.
    ///
    /// # Errors
    ///
    /// Returns an error if MKCALENDAR fails.
    #[tracing::instrument(skip(self, props))]
    pub async fn create_calendar(
        &self,
        href: &Href,
        props: CollectionProps,
    ) -> Result<(), DavError> {
        let body = MkCalendarRequest::new(props).build()?;
        self.send(DavRequest::new(DavMethod::MkCalendar, href.clone()).xml(body))
            .await?;
        Ok(())
    }

    /// Sets and removes properties of a calendar collection.
    ///
    /// # Errors
    ///
    /// Returns an error if PROPPATCH fails or the server refuses any property.
    #[tracing::instrument(skip(self, set, remove))]
    pub async fn update_calendar(
        &self,
        href: &Href,
        set: CollectionProps,
        remove: &[Prop],
    ) -> Result<(), DavError> {
        let request = remove
            .iter()
            .fold(PropPatchRequest::new(set), |request, &prop| request.remove(prop));
        let reply = self
            .send(DavRequest::new(DavMethod::PropPatch, href.clone()).xml(request.build()?))
            .await?;
        if reply.status != 207 {
            return Ok(());
        }

        let multistatus = MultiStatus::from_xml(&reply.body)?;
        let refused: Vec<&str> = multistatus
            .responses
            .iter()
            .flat_map(|r| r.missing.iter().map(String::as_str))
            .collect();
        if refused.is_empty() {
            Ok(())
        } else {
            Err(DavError::Status {
                status: reply.status,
                href: href.clone(),
                message: format!("Properties not updated: {}", refused.join(", ")),
            })
        }
    }

    /// Deletes a collection and everything in it.
    ///
    /// # Errors
    ///
    /// Returns an error if DELETE fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_collection(&self, href: &Href) -> Result<(), DavError> {
        self.send(DavRequest::new(DavMethod::Delete, href.clone()))
            .await?;
        Ok(())
    }

    /// Lists the events of a calendar, optionally limited to a time range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the collection cannot be identified.
    pub async fn list_events(
        &self,
        calendar: &Href,
        range: Option<TimeRange>,
    ) -> Result<ItemList<Event>, DavError> {
        let multistatus = self.calendar_query(calendar, "VEVENT", range).await?;
        convert::events(&multistatus, calendar)
    }

    /// Lists the reminders of a calendar, optionally limited to a time range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the collection cannot be identified.
    pub async fn list_reminders(
        &self,
        calendar: &Href,
        range: Option<TimeRange>,
    ) -> Result<ItemList<Reminder>, DavError> {
        let multistatus = self.calendar_query(calendar, "VTODO", range).await?;
        convert::reminders(&multistatus, calendar)
    }

    /// Lists the contacts of an address book; group cards are filtered out.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the collection cannot be identified.
    pub async fn list_contacts(&self, book: &Href) -> Result<ItemList<Contact>, DavError> {
        let query = AddressbookQueryRequest::new()
            .test(FilterTest::AnyOf)
            .filter(PropFilter::not_defined(KIND_PROPERTY))
            .filter(PropFilter::matching(
                KIND_PROPERTY,
                TextMatch::equals("group").negated(),
            ));
        let multistatus = self.addressbook_query(book, &query).await?;
        convert::contacts(&multistatus, book, &self.ctx)
    }

    /// Lists the contact groups of an address book.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the collection cannot be identified.
    pub async fn list_contact_groups(
        &self,
        book: &Href,
    ) -> Result<ItemList<ContactGroup>, DavError> {
        let query = AddressbookQueryRequest::new()
            .filter(PropFilter::matching(KIND_PROPERTY, TextMatch::equals("group")));
        let multistatus = self.addressbook_query(book, &query).await?;
        convert::contact_groups(&multistatus, book, &self.ctx)
    }

    /// Fetches calendar objects of a calendar by href.
    ///
    /// # Errors
    ///
    /// Returns an error if the multiget fails.
    pub async fn multiget_calendar_objects(
        &self,
        calendar: &Href,
        hrefs: &[Href],
    ) -> Result<ItemList<Calendar>, DavError> {
        let multistatus = self.multiget(calendar, ObjectKind::Calendar, hrefs).await?;
        convert::calendar_objects(&multistatus, calendar)
    }

    /// Fetches cards of an address book by href.
    ///
    /// # Errors
    ///
    /// Returns an error if the multiget fails.
    pub async fn multiget_cards(
        &self,
        book: &Href,
        hrefs: &[Href],
    ) -> Result<ItemList<Card>, DavError> {
        let multistatus = self.multiget(book, ObjectKind::Card, hrefs).await?;
        convert::cards(&multistatus, book, &self.ctx)
    }

    /// Lists the `ETag` of every member of a collection.
    ///
    /// Feed the listing to [`SyncState::changes`](crate::SyncState::changes) on servers
    /// without `sync-collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if PROPFIND fails.
    pub async fn list_etags(&self, collection: &Href) -> Result<Vec<(Href, ETag)>, DavError> {
        let multistatus = self
            .propfind(collection, Depth::One, &[Prop::ResourceType, Prop::GetETag])
            .await?;
        Ok(multistatus
            .responses
            .into_iter()
            .filter(|r| !r.href.same_resource(collection) && !r.props.resource_type.is_collection())
            .filter_map(|r| {
                let etag = r.props.etag?;
                Some((r.href, etag))
            })
            .collect())
    }

    /// Gets a calendar object by href.
    ///
    /// # Errors
    ///
    /// Returns an error if the object doesn't exist or parsing fails.
    pub async fn get_calendar_object(&self, href: &Href) -> Result<Resource<Calendar>, DavError> {
        let reply = self.send(DavRequest::new(DavMethod::Get, href.clone())).await?;
        let parsed = Calendar::parse(&reply.body)?;
        for warning in &parsed.warnings {
            tracing::debug!(%href, %warning, "calendar object parsed with warnings");
        }
        Ok(Resource::new(href.clone(), reply.etag(), parsed.value))
    }

    /// Gets a card by href.
    ///
    /// # Errors
    ///
    /// Returns an error if the card doesn't exist or parsing fails.
    pub async fn get_card(&self, href: &Href) -> Result<Resource<Card>, DavError> {
        let reply = self.send(DavRequest::new(DavMethod::Get, href.clone())).await?;
        let parsed = Card::parse(&reply.body, &self.ctx)?;
        for warning in &parsed.warnings {
            tracing::debug!(%href, %warning, "card parsed with warnings");
        }
        Ok(Resource::new(href.clone(), reply.etag(), parsed.value))
    }

    /// Uploads a calendar object.
    ///
    /// Without an `ETag` the object is created and the write fails if the href is taken;
    /// with one the object is replaced only if it still has that `ETag`. Returns the new
    /// `ETag` when the server reports it.
    ///
    /// # Errors
    ///
    /// Returns [`DavError::Conflict`] if the precondition fails, or another error if
    /// formatting or the request fails.
    pub async fn put_calendar_object(
        &self,
        href: &Href,
        calendar: &Calendar,
        etag: Option<&ETag>,
    ) -> Result<Option<ETag>, DavError> {
        let body = calendar.format(&self.ctx)?;
        self.put(href, ObjectKind::Calendar, body, etag).await
    }

    /// Uploads a card; see [`put_calendar_object`](Self::put_calendar_object).
    ///
    /// # Errors
    ///
    /// Returns [`DavError::Conflict`] if the precondition fails, or another error if
    /// formatting or the request fails.
    pub async fn put_card(
        &self,
        href: &Href,
        card: &Card,
        etag: Option<&ETag>,
    ) -> Result<Option<ETag>, DavError> {
        let body = card.format(&self.ctx)?;
        self.put(href, ObjectKind::Card, body, etag).await
    }

    /// Deletes an object, guarded by its `ETag` when given.
    ///
    /// # Errors
    ///
    /// Returns [`DavError::Conflict`] if the object changed, or another error if
    /// DELETE fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_object(&self, href: &Href, etag: Option<&ETag>) -> Result<(), DavError> {
        let mut request = DavRequest::new(DavMethod::Delete, href.clone());
        if let Some(etag) = etag {
            request = request.if_match(etag);
        }
        self.send(request).await?;
        Ok(())
    }

    /// Reports the changes of a collection since a sync token; without a token every
    /// member is reported.
    ///
    /// # Errors
    ///
    /// Returns [`DavError::InvalidSyncToken`] if the server no longer accepts the token,
    /// or another error if the report fails.
    #[tracing::instrument(skip(self))]
    pub async fn sync_collection(
        &self,
        collection: &Href,
        token: Option<&SyncToken>,
    ) -> Result<SyncDiff, DavError> {
        let body = SyncCollectionRequest::new(token.cloned()).build()?;
        let request = DavRequest::new(DavMethod::Report, collection.clone())
            .depth(Depth::Zero)
            .xml(body);

        let reply = self.transport.send(request).await?;
        if matches!(reply.status, 403 | 409) && reply.body.contains("valid-sync-token") {
            tracing::info!(%collection, "sync token expired, full sync required");
            return Err(DavError::InvalidSyncToken(collection.clone()));
        }
        let reply = check_status(reply, collection)?;
        let multistatus = MultiStatus::from_xml(&reply.body)?;
        let diff = convert::sync_diff(&multistatus, collection)?;
        tracing::debug!(
            changed = diff.changed().count(),
            deleted = diff.deleted().count(),
            "collection synced"
        );
        Ok(diff)
    }

    async fn put(
        &self,
        href: &Href,
        kind: ObjectKind,
        body: String,
        etag: Option<&ETag>,
    ) -> Result<Option<ETag>, DavError> {
        let request = DavRequest::new(DavMethod::Put, href.clone()).body(kind.content_type(), body);
        let request = match etag {
            Some(etag) => request.if_match(etag),
            None => request.if_none_match_any(),
        };
        let reply = self.send(request).await?;
        tracing::debug!(%href, status = reply.status, "object stored");
        Ok(reply.etag())
    }

    async fn propfind(
        &self,
        href: &Href,
        depth: Depth,
        props: &[Prop],
    ) -> Result<MultiStatus, DavError> {
        let body = PropFindRequest::with_properties(props).build()?;
        self.multistatus(
            DavRequest::new(DavMethod::PropFind, href.clone())
                .depth(depth)
                .xml(body),
        )
        .await
    }

    async fn calendar_query(
        &self,
        calendar: &Href,
        component: &str,
        range: Option<TimeRange>,
    ) -> Result<MultiStatus, DavError> {
        let mut query = CalendarQueryRequest::new().component(component);
        if let Some(range) = range {
            query = query.time_range(range);
        }
        self.report(calendar, query.build()?).await
    }

    async fn addressbook_query(
        &self,
        book: &Href,
        query: &AddressbookQueryRequest,
    ) -> Result<MultiStatus, DavError> {
        self.report(book, query.build()?).await
    }

    async fn multiget(
        &self,
        collection: &Href,
        kind: ObjectKind,
        hrefs: &[Href],
    ) -> Result<MultiStatus, DavError> {
        let mut request = MultiGetRequest::new(kind);
        for href in hrefs {
            request.add_href(href.clone());
        }
        if request.is_empty() {
            // Nothing to fetch; still identify the collection so callers get its token.
            return self
                .propfind(collection, Depth::Zero, &COLLECTION_TOKEN_PROPS)
                .await;
        }
        self.report(collection, request.build()?).await
    }

    /// Sends a REPORT whose result must describe the collection.
    ///
    /// Servers usually answer queries with members only; the collection's own
    /// properties are then fetched with a PROPFIND and put in front.
    async fn report(&self, collection: &Href, body: String) -> Result<MultiStatus, DavError> {
        let mut multistatus = self
            .multistatus(
                DavRequest::new(DavMethod::Report, collection.clone())
                    .depth(Depth::One)
                    .xml(body),
            )
            .await?;

        if multistatus.find(collection).is_none() {
            tracing::debug!(%collection, "fetching collection properties");
            let mut container = self
                .propfind(collection, Depth::Zero, &COLLECTION_TOKEN_PROPS)
                .await?;
            container.responses.append(&mut multistatus.responses);
            multistatus.responses = container.responses;
        }
        Ok(multistatus)
    }

    async fn multistatus(&self, request: DavRequest) -> Result<MultiStatus, DavError> {
        let reply = self.send(request).await?;
        MultiStatus::from_xml(&reply.body)
    }

    async fn send(&self, request: DavRequest) -> Result<DavReply, DavError> {
        let href = request.path.clone();
        let reply = self.transport.send(request).await?;
        check_status(reply, &href)
    }
}

/// Href of a new object named after its UID inside a collection.
///
/// Characters that are unsafe in a path segment are replaced by `_`.
#[must_use]
pub fn member_href(collection: &Href, uid: &str, kind: ObjectKind) -> Href {
    let name: String = uid
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '@' => c,
            _ => '_',
        })
        .collect();
    collection.join(&format!("{name}.{}", kind.extension()))
}

fn absorb_homes(discovery: &mut Discovery, multistatus: &MultiStatus) {
    for response in &multistatus.responses {
        let props = &response.props;
        if discovery.principal.is_none() {
            discovery.principal.clone_from(&props.current_user_principal);
        }
        if discovery.calendar_home.is_none() {
            discovery.calendar_home.clone_from(&props.calendar_home_set);
        }
        if discovery.addressbook_home.is_none() {
            discovery.addressbook_home.clone_from(&props.addressbook_home_set);
        }
    }
}

fn check_status(reply: DavReply, href: &Href) -> Result<DavReply, DavError> {
    if reply.is_success() {
        return Ok(reply);
    }
    tracing::debug!(%href, status = reply.status, "request failed");
    Err(match reply.status {
        401 | 403 => DavError::Auth {
            status: reply.status,
        },
        404 => DavError::NotFound(href.clone()),
        412 => DavError::Conflict {
            href: href.clone(),
            etag: reply.header("ETag").map(str::to_string),
        },
        status => DavError::Status {
            status,
            href: href.clone(),
            message: reply.body,
        },
    })
}

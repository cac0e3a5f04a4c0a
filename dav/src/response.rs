// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Multistatus response parser for `WebDAV`, `CalDAV` and `CardDAV` operations.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::DavError;
use crate::types::{ETag, Href, SyncToken};
use crate::xml::{parse_status_line, resolve_entity};

/// `WebDAV` multistatus response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiStatus {
    /// The response items, in document order.
    pub responses: Vec<Response>,
    /// New collection token of a `sync-collection` report (RFC 6578).
    pub sync_token: Option<SyncToken>,
}

/// One `<response>` of a multistatus: a resource and what the server reported for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// The href of the resource.
    pub href: Href,
    /// Status of the whole response, e.g. 404 for a member deleted since the last sync.
    pub status: Option<u16>,
    /// Properties reported with a success status.
    pub props: Properties,
    /// Names of requested properties reported with a failure status.
    pub missing: Vec<String>,
}

impl Response {
    /// Effective status: the response status, or 200 when only propstats were given.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status.unwrap_or(200)
    }

    /// Whether the resource was removed, status 404.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.status == Some(404)
    }

    /// Whether the status is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// `ETag` of the resource.
    #[must_use]
    pub fn etag(&self) -> Option<&ETag> {
        self.props.etag.as_ref()
    }

    /// Whether the response is a successful one describing a collection by resource type.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.is_success() && self.props.resource_type.is_collection()
    }
}

/// Resource types of a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(clippy::struct_excessive_bools)]
pub struct ResourceType {
    /// `<D:collection/>`
    pub collection: bool,
    /// `<C:calendar/>`
    pub calendar: bool,
    /// `<CR:addressbook/>`
    pub addressbook: bool,
    /// `<D:principal/>`
    pub principal: bool,
}

impl ResourceType {
    /// Whether any collection type is set.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        self.collection || self.calendar || self.addressbook
    }
}

/// WebDAV/CalDAV/CardDAV properties. Properties absent from the response are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    /// `displayname`
    pub display_name: Option<String>,
    /// `resourcetype`
    pub resource_type: ResourceType,
    /// `getetag`
    pub etag: Option<ETag>,
    /// `getctag`
    pub ctag: Option<String>,
    /// `sync-token`
    pub sync_token: Option<SyncToken>,
    /// `current-user-principal`
    pub current_user_principal: Option<Href>,
    /// `calendar-home-set`
    pub calendar_home_set: Option<Href>,
    /// `addressbook-home-set`
    pub addressbook_home_set: Option<Href>,
    /// `supported-calendar-component-set`
    pub supported_components: Vec<String>,
    /// `supported-report-set`
    pub supported_reports: Vec<String>,
    /// `calendar-description`
    pub calendar_description: Option<String>,
    /// `addressbook-description`
    pub addressbook_description: Option<String>,
    /// `calendar-timezone`
    pub calendar_timezone: Option<String>,
    /// `calendar-color`
    pub calendar_color: Option<String>,
    /// `calendar-order`
    pub calendar_order: Option<i32>,
    /// `calendar-data`
    pub calendar_data: Option<String>,
    /// `address-data`
    pub address_data: Option<String>,
}

macro_rules! absorb {
    ($target:expr, $source:expr; options: $($opt:ident),+; lists: $($list:ident),+) => {
        $(if $source.$opt.is_some() {
            $target.$opt = $source.$opt;
        })+
        $($target.$list.extend($source.$list);)+
    };
}

impl Properties {
    /// Collection tag: the sync token, else the `CTag`, else the `ETag`.
    #[must_use]
    pub fn collection_token(&self) -> Option<SyncToken> {
        self.sync_token.clone().or_else(|| {
            self.ctag
                .as_deref()
                .or(self.etag.as_deref())
                .map(SyncToken::from)
        })
    }

    fn absorb(&mut self, other: Self) {
        let kinds = other.resource_type;
        self.resource_type.collection |= kinds.collection;
        self.resource_type.calendar |= kinds.calendar;
        self.resource_type.addressbook |= kinds.addressbook;
        self.resource_type.principal |= kinds.principal;
        absorb!(self, other;
            options: display_name, etag, ctag, sync_token, current_user_principal,
                calendar_home_set, addressbook_home_set, calendar_description,
                addressbook_description, calendar_timezone, calendar_color, calendar_order,
                calendar_data, address_data;
            lists: supported_components, supported_reports);
    }

    /// Stores the text of a leaf property; returns whether the name is known.
    fn set_text(&mut self, name: &str, text: String) -> bool {
        let trimmed = || text.trim().to_string();
        match name {
            "displayname" => self.display_name = Some(trimmed()),
            "getetag" => self.etag = Some(ETag::new(trimmed())),
            "getctag" => self.ctag = Some(trimmed()),
            "sync-token" => self.sync_token = Some(SyncToken::new(trimmed())),
            "calendar-description" => self.calendar_description = Some(trimmed()),
            "addressbook-description" => self.addressbook_description = Some(trimmed()),
            "calendar-timezone" => self.calendar_timezone = Some(text),
            "calendar-color" => self.calendar_color = Some(trimmed()),
            "calendar-order" => self.calendar_order = text.trim().parse().ok(),
            "calendar-data" => self.calendar_data = Some(text),
            "address-data" => self.address_data = Some(text),
            _ => return false,
        }
        true
    }

    fn set_href(&mut self, property: &str, href: Href) {
        match property {
            "current-user-principal" => self.current_user_principal = Some(href),
            "calendar-home-set" => self.calendar_home_set = Some(href),
            "addressbook-home-set" => self.addressbook_home_set = Some(href),
            _ => {}
        }
    }
}

/// Parser state of one `<propstat>`.
#[derive(Debug, Default)]
struct PropStatState {
    props: Properties,
    names: Vec<String>,
    status: Option<u16>,
}

/// Parser state of one `<response>`.
#[derive(Debug, Default)]
struct ResponseState {
    response: Response,
    propstat: Option<PropStatState>,
}

impl ResponseState {
    fn finish_propstat(&mut self) {
        let Some(propstat) = self.propstat.take() else {
            return;
        };
        match propstat.status {
            Some(status) if !(200..300).contains(&status) => {
                self.response.missing.extend(propstat.names);
            }
            _ => self.response.props.absorb(propstat.props),
        }
    }
}

impl MultiStatus {
    /// Parses multistatus response from XML.
    ///
    /// Elements are matched by local name; unknown properties are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails or the root is not a multistatus.
    pub fn from_xml(xml: &str) -> Result<Self, DavError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().check_end_names = true;

        let mut multistatus = Self::default();
        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut current: Option<ResponseState> = None;
        let mut seen_root = false;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let name = local_name(&reader, e)?;
                    if path.is_empty() {
                        check_root(&name)?;
                        seen_root = true;
                    }
                    open_element(&reader, e, &name, &path, &mut current)?;
                    path.push(name);
                    text.clear();
                }
                Event::Empty(ref e) => {
                    let name = local_name(&reader, e)?;
                    if path.is_empty() {
                        check_root(&name)?;
                        seen_root = true;
                        break;
                    }
                    open_element(&reader, e, &name, &path, &mut current)?;
                    close_element(&name, &path, String::new(), &mut multistatus, &mut current);
                }
                Event::Text(ref e) => text.push_str(&reader.decoder().decode(e)?),
                Event::CData(ref e) => text.push_str(&reader.decoder().decode(e)?),
                Event::GeneralRef(ref e) => {
                    text.push_str(&resolve_entity(&reader.decoder().decode(e)?));
                }
                Event::End(_) => {
                    let Some(name) = path.pop() else {
                        break;
                    };
                    close_element(
                        &name,
                        &path,
                        std::mem::take(&mut text),
                        &mut multistatus,
                        &mut current,
                    );
                    if path.is_empty() {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(DavError::InvalidResponse(
                "Empty multistatus document".to_string(),
            ));
        }
        Ok(multistatus)
    }

    /// The response whose href names the given resource.
    #[must_use]
    pub fn find(&self, href: &Href) -> Option<&Response> {
        self.responses.iter().find(|r| r.href.same_resource(href))
    }
}

fn local_name(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<String, DavError> {
    let local = e.local_name();
    Ok(reader.decoder().decode(local.into_inner())?.into_owned())
}

fn check_root(name: &str) -> Result<(), DavError> {
    if name == "multistatus" {
        Ok(())
    } else {
        Err(DavError::InvalidResponse(format!(
            "Expected multistatus, found {name}"
        )))
    }
}

fn parent(path: &[String]) -> &str {
    path.last().map_or("", String::as_str)
}

fn grandparent(path: &[String]) -> &str {
    path.len()
        .checked_sub(2)
        .and_then(|i| path.get(i))
        .map_or("", String::as_str)
}

/// Handles an element as it opens; `path` does not include the element yet.
fn open_element(
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
    name: &str,
    path: &[String],
    current: &mut Option<ResponseState>,
) -> Result<(), DavError> {
    if name == "response" && parent(path) == "multistatus" {
        *current = Some(ResponseState::default());
        return Ok(());
    }

    let Some(state) = current.as_mut() else {
        return Ok(());
    };
    if name == "propstat" {
        state.propstat = Some(PropStatState::default());
        return Ok(());
    }
    let Some(propstat) = state.propstat.as_mut() else {
        return Ok(());
    };

    match (parent(path), grandparent(path)) {
        ("prop", _) => propstat.names.push(name.to_string()),
        ("resourcetype", _) => {
            let kinds = &mut propstat.props.resource_type;
            match name {
                "collection" => kinds.collection = true,
                "calendar" => kinds.calendar = true,
                "addressbook" => kinds.addressbook = true,
                "principal" => kinds.principal = true,
                _ => {}
            }
        }
        ("supported-calendar-component-set", _) if name == "comp" => {
            if let Ok(Some(attr)) = e.try_get_attribute("name") {
                let component = reader.decoder().decode(&attr.value)?;
                propstat.props.supported_components.push(component.into_owned());
            }
        }
        ("report", "supported-report") => propstat.props.supported_reports.push(name.to_string()),
        _ => {}
    }
    Ok(())
}

/// Handles an element as it closes; `path` no longer includes the element.
fn close_element(
    name: &str,
    path: &[String],
    text: String,
    multistatus: &mut MultiStatus,
    current: &mut Option<ResponseState>,
) {
    match (name, parent(path)) {
        ("sync-token", "multistatus") => {
            let token = text.trim();
            if !token.is_empty() {
                multistatus.sync_token = Some(SyncToken::from(token));
            }
            return;
        }
        ("response", "multistatus") => {
            if let Some(mut state) = current.take() {
                state.finish_propstat();
                multistatus.responses.push(state.response);
            }
            return;
        }
        _ => {}
    }

    let Some(state) = current.as_mut() else {
        return;
    };
    match (name, parent(path)) {
        ("href", "response") => state.response.href = Href::new(text.trim().to_string()),
        ("status", "response") => state.response.status = parse_status_line(&text),
        ("propstat", "response") => state.finish_propstat(),
        ("status", "propstat") => {
            if let Some(propstat) = state.propstat.as_mut() {
                propstat.status = parse_status_line(&text);
            }
        }
        ("href", property) => {
            let href = text.trim();
            if let Some(propstat) = state.propstat.as_mut()
                && !href.is_empty()
            {
                propstat.props.set_href(property, Href::from(href));
            }
        }
        (property, "prop") => {
            if let Some(propstat) = state.propstat.as_mut()
                && !text.is_empty()
                && !propstat.props.set_text(property, text)
            {
                tracing::trace!(property, "skipping unknown property");
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_other_roots() {
        let err = MultiStatus::from_xml("<D:error xmlns:D=\"DAV:\"/>").unwrap_err();
        assert!(matches!(err, DavError::InvalidResponse(_)));
        assert!(MultiStatus::from_xml("").is_err());
    }

    #[test]
    fn resolves_entities_and_cdata() {
        let xml = "\
<d:multistatus xmlns:d=\"DAV:\" xmlns:cal=\"urn:ietf:params:xml:ns:caldav\">
  <d:response>
    <d:href>/cal/a.ics</d:href>
    <d:propstat>
      <d:prop>
        <d:displayname>Tom &amp; Jerry</d:displayname>
        <cal:calendar-data><![CDATA[BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n]]></cal:calendar-data>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>";
        let multistatus = MultiStatus::from_xml(xml).unwrap();
        let props = &multistatus.responses[0].props;
        assert_eq!(props.display_name.as_deref(), Some("Tom & Jerry"));
        assert_eq!(
            props.calendar_data.as_deref(),
            Some("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n")
        );
    }

    #[test]
    fn failed_propstat_lists_missing_properties() {
        let xml = r#"
<multistatus xmlns="DAV:" xmlns:CS="http://calendarserver.org/ns/">
  <response>
    <href>/cal/</href>
    <propstat>
      <prop><getetag>"1"</getetag></prop>
      <status>HTTP/1.1 200 OK</status>
    </propstat>
    <propstat>
      <prop><CS:getctag/><displayname>ignored</displayname></prop>
      <status>HTTP/1.1 404 Not Found</status>
    </propstat>
  </response>
</multistatus>"#;
        let multistatus = MultiStatus::from_xml(xml).unwrap();
        let response = &multistatus.responses[0];
        assert_eq!(response.etag().map(ETag::as_str), Some("\"1\""));
        assert_eq!(response.props.display_name, None);
        assert_eq!(response.missing, ["getctag", "displayname"]);
        assert!(response.is_success());
    }

    #[test]
    fn collection_token_prefers_sync_token() {
        let mut props = Properties {
            etag: Some(ETag::from("e")),
            ..Properties::default()
        };
        assert_eq!(props.collection_token(), Some(SyncToken::from("e")));
        props.ctag = Some("c".into());
        assert_eq!(props.collection_token(), Some(SyncToken::from("c")));
        props.sync_token = Some(SyncToken::from("s"));
        assert_eq!(props.collection_token(), Some(SyncToken::from("s")));
    }
}

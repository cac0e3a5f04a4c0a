// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsing and conversion tests.

use davsync_codec::CodecContext;
use davsync_dav::convert::{self, find_collection};
use davsync_dav::{DavError, Href, ItemError, MultiStatus, SyncToken};

const CALENDAR_HOME: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav"
    xmlns:CS="http://calendarserver.org/ns/" xmlns:A="http://apple.com/ns/ical/">
  <D:response>
    <D:href>/dav/calendars/user/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/></D:resourcetype>
        <CS:getctag>home-1</CS:getctag>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/dav/calendars/user/work/</D:href>
    <D:propstat>
      <D:prop>
        <D:displayname>Work</D:displayname>
        <D:resourcetype><D:collection/><C:calendar/></D:resourcetype>
        <C:calendar-description>Office hours</C:calendar-description>
        <C:supported-calendar-component-set>
          <C:comp name="VEVENT"/>
          <C:comp name="VTODO"/>
        </C:supported-calendar-component-set>
        <A:calendar-color>#FF2968FF</A:calendar-color>
        <A:calendar-order>2</A:calendar-order>
        <CS:getctag>work-5</CS:getctag>
        <D:sync-token>http://example.com/sync/5</D:sync-token>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/dav/calendars/user/inbox/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/><C:schedule-inbox/></D:resourcetype>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

const EVENTS: &str = "\
<?xml version=\"1.0\" encoding=\"utf-8\" ?>
<D:multistatus xmlns:D=\"DAV:\" xmlns:C=\"urn:ietf:params:xml:ns:caldav\">
  <D:response>
    <D:href>/dav/calendars/user/work/</D:href>
    <D:propstat>
      <D:prop><D:getetag>\"collection-etag\"</D:getetag></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/dav/calendars/user/work/standup.ics</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>\"e1\"</D:getetag>
        <C:calendar-data>BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example//EN\r
BEGIN:VEVENT\r
UID:standup-1\r
DTSTAMP:20250101T090000Z\r
DTSTART:20250106T093000Z\r
SUMMARY:Standup &amp; coffee\r
END:VEVENT\r
END:VCALENDAR\r
</C:calendar-data>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/dav/calendars/user/work/broken.ics</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>\"e2\"</D:getetag>
        <C:calendar-data>BEGIN:VCALENDAR\r
VERSION:2.0\r
BEGIN:VEVENT\r
SUMMARY:No identity\r
END:VEVENT\r
END:VCALENDAR\r
</C:calendar-data>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>";

#[test]
fn response_parse_multistatus_basic() {
    let xml = "\
<?xml version=\"1.0\" encoding=\"utf-8\" ?>
<D:multistatus xmlns:D=\"DAV:\">
  <D:response>
    <D:href>/calendars/user/event1.ics</D:href>
    <D:propstat>
      <D:prop>
        <D:getetag>\"12345\"</D:getetag>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>";

    let response = MultiStatus::from_xml(xml).expect("Failed to parse multistatus");

    assert_eq!(response.responses.len(), 1);
    assert_eq!(
        response.responses[0].href.as_str(),
        "/calendars/user/event1.ics"
    );
    assert_eq!(
        response.responses[0].etag().map(|e| e.as_str()),
        Some("\"12345\"")
    );
    assert_eq!(response.responses[0].status(), 200);
}

#[test]
fn response_parse_default_namespace_and_response_status() {
    let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<multistatus xmlns="DAV:">
  <response>
    <href>/book/gone.vcf</href>
    <status>HTTP/1.1 404 Not Found</status>
  </response>
  <sync-token>http://example.com/sync/9</sync-token>
</multistatus>"#;

    let response = MultiStatus::from_xml(xml).expect("Failed to parse multistatus");

    assert_eq!(response.responses.len(), 1);
    assert!(response.responses[0].is_deleted());
    assert_eq!(
        response.sync_token,
        Some(SyncToken::from("http://example.com/sync/9"))
    );
}

#[test]
fn response_parse_home_sets() {
    let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<d:multistatus xmlns:d="DAV:" xmlns:card="urn:ietf:params:xml:ns:carddav"
    xmlns:cal="urn:ietf:params:xml:ns:caldav">
  <d:response>
    <d:href>/</d:href>
    <d:propstat>
      <d:prop>
        <d:current-user-principal><d:href>/principals/jane/</d:href></d:current-user-principal>
        <cal:calendar-home-set><d:href>/calendars/jane/</d:href></cal:calendar-home-set>
        <card:addressbook-home-set>
          <d:href>/addressbooks/jane/</d:href>
        </card:addressbook-home-set>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

    let response = MultiStatus::from_xml(xml).expect("Failed to parse multistatus");
    let props = &response.responses[0].props;

    assert_eq!(
        props.current_user_principal,
        Some(Href::from("/principals/jane/"))
    );
    assert_eq!(props.calendar_home_set, Some(Href::from("/calendars/jane/")));
    assert_eq!(
        props.addressbook_home_set,
        Some(Href::from("/addressbooks/jane/"))
    );
}

#[test]
fn response_parse_supported_reports() {
    let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/book/</D:href>
    <D:propstat>
      <D:prop>
        <D:supported-report-set>
          <D:supported-report><D:report><D:sync-collection/></D:report></D:supported-report>
          <D:supported-report><D:report><D:expand-property/></D:report></D:supported-report>
        </D:supported-report-set>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

    let response = MultiStatus::from_xml(xml).expect("Failed to parse multistatus");

    assert_eq!(
        response.responses[0].props.supported_reports,
        ["sync-collection", "expand-property"]
    );
}

#[test]
fn response_rejects_malformed_xml() {
    assert!(MultiStatus::from_xml("<D:multistatus xmlns:D=\"DAV:\"></D:response>").is_err());
    assert!(matches!(
        MultiStatus::from_xml("<html><body>Login</body></html>"),
        Err(DavError::InvalidResponse(_))
    ));
}

#[test]
fn convert_calendar_list() {
    let multistatus = MultiStatus::from_xml(CALENDAR_HOME).expect("Failed to parse multistatus");
    let home = Href::from("/dav/calendars/user/");

    let list = convert::calendars(&multistatus, &home).expect("Failed to convert");

    assert_eq!(list.token, Some(SyncToken::from("home-1")));
    assert_eq!(list.collections.len(), 1);
    let work = &list.collections[0];
    assert_eq!(work.href.as_str(), "/dav/calendars/user/work/");
    assert_eq!(work.display_name.as_deref(), Some("Work"));
    assert_eq!(work.description.as_deref(), Some("Office hours"));
    assert_eq!(work.color.as_deref(), Some("#FF2968FF"));
    assert_eq!(work.order, Some(2));
    assert_eq!(work.supported_components, ["VEVENT", "VTODO"]);
    assert_eq!(work.ctag.as_deref(), Some("work-5"));
    assert_eq!(
        work.sync_token,
        Some(SyncToken::from("http://example.com/sync/5"))
    );
}

#[test]
fn convert_event_list() {
    let multistatus = MultiStatus::from_xml(EVENTS).expect("Failed to parse multistatus");
    let calendar = Href::from("/dav/calendars/user/work/");

    let list = convert::events(&multistatus, &calendar).expect("Failed to convert");

    assert_eq!(list.collection, calendar);
    assert_eq!(list.token, Some(SyncToken::from("\"collection-etag\"")));
    assert_eq!(list.len(), 1);
    let standup = &list.items[0];
    assert_eq!(standup.id(), "standup");
    assert_eq!(standup.etag.as_ref().map(|e| e.as_str()), Some("\"e1\""));
    assert_eq!(standup.value.meta.uid, "standup-1");
    assert_eq!(standup.value.summary.as_deref(), Some("Standup & coffee"));

    assert_eq!(list.failures.len(), 1);
    assert_eq!(list.failures[0].href.as_str(), "/dav/calendars/user/work/broken.ics");
    assert!(matches!(list.failures[0].error, ItemError::Codec(_)));
}

#[test]
fn convert_requires_collection_response() {
    let xml = r#"<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/book/a.vcf</D:href>
    <D:propstat>
      <D:prop><D:getetag>"1"</D:getetag></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;
    let multistatus = MultiStatus::from_xml(xml).expect("Failed to parse multistatus");

    assert_eq!(find_collection(&multistatus, &Href::from("/book/")), None);
    assert!(matches!(
        convert::contacts(&multistatus, &Href::from("/book/"), &CodecContext::default()),
        Err(DavError::MissingCollectionResponse(_))
    ));
    assert!(matches!(
        convert::sync_diff(&multistatus, &Href::from("/book/")),
        Err(DavError::MissingCollectionResponse(_))
    ));
}

#[test]
fn convert_sync_diff_flags_deleted_members() {
    let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/book/</D:href>
    <D:propstat>
      <D:prop><D:sync-token>token-2</D:sync-token></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/book/removed.vcf</D:href>
    <D:status>HTTP/1.1 404 Not Found</D:status>
  </D:response>
</D:multistatus>"#;
    let multistatus = MultiStatus::from_xml(xml).expect("Failed to parse multistatus");

    let diff = convert::sync_diff(&multistatus, &Href::from("/book/")).expect("Failed to convert");

    assert_eq!(diff.token, Some(SyncToken::from("token-2")));
    assert_eq!(diff.items.len(), 1);
    assert!(diff.items[0].deleted);
    assert_eq!(diff.items[0].id, "removed");
    assert_eq!(diff.items[0].etag, None);
}

#[test]
fn convert_sync_diff_reports_changed_members() {
    let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/cal/new.ics</D:href>
    <D:propstat>
      <D:prop><D:getetag>"n1"</D:getetag></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/cal/locked.ics</D:href>
    <D:status>HTTP/1.1 403 Forbidden</D:status>
  </D:response>
  <D:sync-token>token-3</D:sync-token>
</D:multistatus>"#;
    let multistatus = MultiStatus::from_xml(xml).expect("Failed to parse multistatus");

    let diff = convert::sync_diff(&multistatus, &Href::from("/cal/")).expect("Failed to convert");

    assert_eq!(diff.token, Some(SyncToken::from("token-3")));
    assert_eq!(diff.changed().count(), 1);
    assert_eq!(diff.items[0].etag.as_ref().map(|e| e.as_str()), Some("\"n1\""));
    assert_eq!(diff.failures.len(), 1);
    assert_eq!(diff.failures[0].error, ItemError::Status(403));
}

#[test]
fn convert_sync_diff_keeps_extensionless_members() {
    let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/book/c1001</D:href>
    <D:status>HTTP/1.1 404 Not Found</D:status>
  </D:response>
  <D:response>
    <D:href>/book/c1002</D:href>
    <D:propstat>
      <D:prop><D:getetag>"e2"</D:getetag></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:sync-token>http://example.com/sync/9</D:sync-token>
</D:multistatus>"#;
    let multistatus = MultiStatus::from_xml(xml).expect("Failed to parse multistatus");

    let diff = convert::sync_diff(&multistatus, &Href::from("/book/")).expect("Failed to convert");

    assert_eq!(diff.token, Some(SyncToken::from("http://example.com/sync/9")));
    assert_eq!(diff.items.len(), 2);
    assert_eq!(diff.items[0].href.as_str(), "/book/c1001");
    assert!(diff.items[0].deleted);
    assert_eq!(diff.items[1].id, "c1002");
    assert!(!diff.items[1].deleted);
    assert_eq!(diff.items[1].etag.as_ref().map(|e| e.as_str()), Some("\"e2\""));
}

// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request building tests.

use davsync_dav::{
    AddressbookQueryRequest, CalendarQueryRequest, CollectionProps, DavError, FilterTest,
    MkCalendarRequest, MultiGetRequest, ObjectKind, Prop, PropFilter, PropFindRequest,
    PropPatchRequest, SyncCollectionRequest, SyncLevel, SyncToken, TextMatch, TimeRange,
};

#[test]
fn request_propfind_builds_xml() {
    let mut request = PropFindRequest::new();
    request.add_property(Prop::DisplayName);
    request.add_property(Prop::GetETag);
    request.add_property(Prop::ResourceType);

    let xml = request.build().expect("Failed to build PROPFIND XML");

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(xml.contains("<D:propfind xmlns:D=\"DAV:\">"));
    assert!(xml.contains("<D:prop>"));
    assert!(xml.contains("<D:displayname/>"));
    assert!(xml.contains("<D:getetag/>"));
    assert!(xml.contains("<D:resourcetype/>"));
    assert!(xml.contains("</D:prop>"));
    assert!(xml.contains("</D:propfind>"));
}

#[test]
fn request_propfind_collection_properties_include_namespaces() {
    let xml = PropFindRequest::with_properties(&Prop::CALENDAR_COLLECTION)
        .build()
        .expect("Failed to build PROPFIND XML");

    assert!(xml.contains("xmlns:D=\"DAV:\""));
    assert!(xml.contains("xmlns:C=\"urn:ietf:params:xml:ns:caldav\""));
    assert!(xml.contains("xmlns:CS=\"http://calendarserver.org/ns/\""));
    assert!(xml.contains("xmlns:A=\"http://apple.com/ns/ical/\""));
    assert!(xml.contains("<C:supported-calendar-component-set/>"));
    assert!(xml.contains("<A:calendar-color/>"));
    assert!(xml.contains("<CS:getctag/>"));
    assert!(xml.contains("<D:sync-token/>"));
}

#[test]
fn request_propfind_addressbook_home_uses_carddav_prefix() {
    let xml = PropFindRequest::with_properties(&[Prop::AddressbookHomeSet])
        .build()
        .expect("Failed to build PROPFIND XML");

    assert!(xml.contains("xmlns:CR=\"urn:ietf:params:xml:ns:carddav\""));
    assert!(xml.contains("<CR:addressbook-home-set/>"));
}

#[test]
fn request_calendar_query_builds_xml() {
    let start = "2025-01-01T00:00:00Z".parse().unwrap();
    let end = "2025-01-31T23:59:59Z".parse().unwrap();
    let request = CalendarQueryRequest::new()
        .component("VEVENT")
        .time_range(TimeRange::between(start, end));

    let xml = request.build().expect("Failed to build calendar-query XML");

    assert!(xml.contains("<C:calendar-query"));
    assert!(xml.contains("<D:getetag/>"));
    assert!(xml.contains("<C:calendar-data/>"));
    assert!(xml.contains("<C:comp-filter name=\"VCALENDAR\">"));
    assert!(xml.contains("<C:comp-filter name=\"VEVENT\">"));
    assert!(xml.contains("<C:time-range start=\"20250101T000000Z\" end=\"20250131T235959Z\"/>"));
}

#[test]
fn request_calendar_query_without_time_range() {
    let xml = CalendarQueryRequest::new()
        .component("VTODO")
        .build()
        .expect("Failed to build calendar-query XML");

    assert!(xml.contains("<C:comp-filter name=\"VTODO\"/>"));
    assert!(!xml.contains("time-range"));
}

#[test]
fn request_calendar_query_time_range_needs_component() {
    let start = "2025-01-01T00:00:00Z".parse().unwrap();
    let result = CalendarQueryRequest::new()
        .time_range(TimeRange::starting(start))
        .build();

    assert!(matches!(result, Err(DavError::InvalidRequest(_))));
}

#[test]
fn request_addressbook_query_with_text_match() {
    let xml = AddressbookQueryRequest::new()
        .test(FilterTest::AnyOf)
        .filter(PropFilter::not_defined("X-ADDRESSBOOKSERVER-KIND"))
        .filter(PropFilter::matching(
            "X-ADDRESSBOOKSERVER-KIND",
            TextMatch::equals("group").negated(),
        ))
        .build()
        .expect("Failed to build addressbook-query XML");

    assert!(xml.contains("<CR:addressbook-query xmlns:D=\"DAV:\" xmlns:CR=\"urn:ietf:params:xml:ns:carddav\">"));
    assert!(xml.contains("<CR:address-data/>"));
    assert!(xml.contains("<CR:filter test=\"anyof\">"));
    assert!(xml.contains("<CR:is-not-defined/>"));
    assert!(xml.contains(
        "<CR:text-match collation=\"i;unicode-casemap\" match-type=\"equals\" negate-condition=\"yes\">group</CR:text-match>"
    ));
}

#[test]
fn request_addressbook_query_without_filters() {
    let xml = AddressbookQueryRequest::new()
        .build()
        .expect("Failed to build addressbook-query XML");

    assert!(xml.contains("<CR:filter/>"));
}

#[test]
fn request_multiget_lists_hrefs() {
    let mut request = MultiGetRequest::new(ObjectKind::Card);
    request
        .add_href("/addressbooks/jane/contacts/a.vcf".into())
        .add_href("/addressbooks/jane/contacts/b.vcf".into());

    let xml = request.build().expect("Failed to build multiget XML");

    assert!(xml.contains("<CR:addressbook-multiget"));
    assert!(xml.contains("<D:href>/addressbooks/jane/contacts/a.vcf</D:href>"));
    assert!(xml.contains("<D:href>/addressbooks/jane/contacts/b.vcf</D:href>"));

    let xml = MultiGetRequest::new(ObjectKind::Calendar)
        .build()
        .expect("Failed to build multiget XML");
    assert!(xml.contains("<C:calendar-multiget"));
    assert!(xml.contains("<C:calendar-data/>"));
}

#[test]
fn request_mkcalendar_sets_properties() {
    let props = CollectionProps {
        display_name: Some("Work & Travel".to_string()),
        description: Some("Trips".to_string()),
        color: Some("#FF2968FF".to_string()),
        order: Some(3),
        components: vec!["VEVENT".to_string(), "VTODO".to_string()],
    };

    let xml = MkCalendarRequest::new(props)
        .build()
        .expect("Failed to build MKCALENDAR XML");

    assert!(xml.contains("<C:mkcalendar"));
    assert!(xml.contains("<D:set>"));
    assert!(xml.contains("<D:displayname>Work &amp; Travel</D:displayname>"));
    assert!(xml.contains("<C:calendar-description>Trips</C:calendar-description>"));
    assert!(xml.contains("<A:calendar-color>#FF2968FF</A:calendar-color>"));
    assert!(xml.contains("<A:calendar-order>3</A:calendar-order>"));
    assert!(xml.contains("<C:comp name=\"VEVENT\"/>"));
    assert!(xml.contains("<C:comp name=\"VTODO\"/>"));
}

#[test]
fn request_proppatch_sets_and_removes() {
    let set = CollectionProps {
        display_name: Some("Renamed".to_string()),
        ..CollectionProps::default()
    };

    let xml = PropPatchRequest::new(set)
        .remove(Prop::CalendarColor)
        .build()
        .expect("Failed to build PROPPATCH XML");

    assert!(xml.contains("<D:propertyupdate"));
    assert!(xml.contains("<D:displayname>Renamed</D:displayname>"));
    assert!(xml.contains("<D:remove>"));
    assert!(xml.contains("<A:calendar-color/>"));
}

#[test]
fn request_sync_collection_with_token() {
    let xml = SyncCollectionRequest::new(Some(SyncToken::from("http://example.com/sync/7")))
        .level(SyncLevel::Infinite)
        .limit(100)
        .build()
        .expect("Failed to build sync-collection XML");

    assert!(xml.contains("<D:sync-collection xmlns:D=\"DAV:\">"));
    assert!(xml.contains("<D:sync-token>http://example.com/sync/7</D:sync-token>"));
    assert!(xml.contains("<D:sync-level>infinite</D:sync-level>"));
    assert!(xml.contains("<D:nresults>100</D:nresults>"));
    assert!(xml.contains("<D:getetag/>"));
}

#[test]
fn request_sync_collection_initial() {
    let xml = SyncCollectionRequest::new(None)
        .property(Prop::GetETag)
        .build()
        .expect("Failed to build sync-collection XML");

    assert!(xml.contains("<D:sync-token/>"));
    assert!(xml.contains("<D:sync-level>1</D:sync-level>"));
    assert_eq!(xml.matches("<D:getetag/>").count(), 1);
}

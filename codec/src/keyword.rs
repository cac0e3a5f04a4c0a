// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Keywords of the vCard (RFC 2426, RFC 6350) and iCalendar (RFC 5545) text formats.

pub const KW_BEGIN: &str = "BEGIN";
pub const KW_END: &str = "END";

// Components
pub const KW_VCARD: &str = "VCARD";
pub const KW_VCALENDAR: &str = "VCALENDAR";
pub const KW_VEVENT: &str = "VEVENT";
pub const KW_VTODO: &str = "VTODO";
pub const KW_VJOURNAL: &str = "VJOURNAL";
pub const KW_VFREEBUSY: &str = "VFREEBUSY";
pub const KW_VTIMEZONE: &str = "VTIMEZONE";
pub const KW_VALARM: &str = "VALARM";
pub const KW_STANDARD: &str = "STANDARD";
pub const KW_DAYLIGHT: &str = "DAYLIGHT";

// Parameters
pub const KW_TYPE: &str = "TYPE";
pub const KW_PREF: &str = "PREF";
pub const KW_ENCODING: &str = "ENCODING";
pub const KW_CHARSET: &str = "CHARSET";
pub const KW_VALUE: &str = "VALUE";
pub const KW_TZID: &str = "TZID";
pub const KW_X_USER: &str = "X-USER";

// Parameter values
pub const KW_VALUE_DATE: &str = "DATE";
pub const KW_VALUE_URI: &str = "URI";
pub const KW_ENCODING_B: &str = "B";
pub const KW_ENCODING_BASE64: &str = "BASE64";
pub const KW_ENCODING_QP: &str = "QUOTED-PRINTABLE";
pub const KW_ENCODING_7BIT: &str = "7BIT";
pub const KW_ENCODING_8BIT: &str = "8BIT";

// Shared properties
pub const KW_VERSION: &str = "VERSION";
pub const KW_PRODID: &str = "PRODID";
pub const KW_UID: &str = "UID";
pub const KW_URL: &str = "URL";
pub const KW_CATEGORIES: &str = "CATEGORIES";

// vCard properties
pub const KW_FN: &str = "FN";
pub const KW_N: &str = "N";
pub const KW_NICKNAME: &str = "NICKNAME";
pub const KW_ORG: &str = "ORG";
pub const KW_TITLE: &str = "TITLE";
pub const KW_NOTE: &str = "NOTE";
pub const KW_BDAY: &str = "BDAY";
pub const KW_REV: &str = "REV";
pub const KW_ADR: &str = "ADR";
pub const KW_TEL: &str = "TEL";
pub const KW_EMAIL: &str = "EMAIL";
pub const KW_PHOTO: &str = "PHOTO";
pub const KW_LOGO: &str = "LOGO";
pub const KW_SOUND: &str = "SOUND";
pub const KW_KEY: &str = "KEY";
pub const KW_KIND: &str = "KIND";
pub const KW_MEMBER: &str = "MEMBER";
pub const KW_GEO: &str = "GEO";
pub const KW_CLIENTPIDMAP: &str = "CLIENTPIDMAP";

// Apple address book extensions
pub const KW_X_ABLABEL: &str = "X-ABLABEL";
pub const KW_X_ABADR: &str = "X-ABADR";
pub const KW_X_ABDATE: &str = "X-ABDATE";
pub const KW_X_ABRELATEDNAMES: &str = "X-ABRELATEDNAMES";
pub const KW_X_SOCIALPROFILE: &str = "X-SOCIALPROFILE";
pub const KW_X_ADDRESSBOOKSERVER_KIND: &str = "X-ADDRESSBOOKSERVER-KIND";
pub const KW_X_ADDRESSBOOKSERVER_MEMBER: &str = "X-ADDRESSBOOKSERVER-MEMBER";

pub const KW_KIND_GROUP: &str = "group";
pub const KW_URN_UUID: &str = "urn:uuid:";

// iCalendar properties
pub const KW_CALSCALE: &str = "CALSCALE";
pub const KW_METHOD: &str = "METHOD";
pub const KW_SUMMARY: &str = "SUMMARY";
pub const KW_DESCRIPTION: &str = "DESCRIPTION";
pub const KW_LOCATION: &str = "LOCATION";
pub const KW_STATUS: &str = "STATUS";
pub const KW_TRANSP: &str = "TRANSP";
pub const KW_PRIORITY: &str = "PRIORITY";
pub const KW_PERCENT_COMPLETE: &str = "PERCENT-COMPLETE";
pub const KW_SEQUENCE: &str = "SEQUENCE";
pub const KW_DTSTART: &str = "DTSTART";
pub const KW_DTEND: &str = "DTEND";
pub const KW_DUE: &str = "DUE";
pub const KW_DURATION: &str = "DURATION";
pub const KW_DTSTAMP: &str = "DTSTAMP";
pub const KW_CREATED: &str = "CREATED";
pub const KW_LAST_MODIFIED: &str = "LAST-MODIFIED";
pub const KW_COMPLETED: &str = "COMPLETED";
pub const KW_RRULE: &str = "RRULE";
pub const KW_EXRULE: &str = "EXRULE";
pub const KW_RDATE: &str = "RDATE";
pub const KW_EXDATE: &str = "EXDATE";
pub const KW_RECURRENCE_ID: &str = "RECURRENCE-ID";
pub const KW_ACTION: &str = "ACTION";
pub const KW_TRIGGER: &str = "TRIGGER";
pub const KW_REPEAT: &str = "REPEAT";
pub const KW_ATTACH: &str = "ATTACH";
pub const KW_REQUEST_STATUS: &str = "REQUEST-STATUS";
pub const KW_FREEBUSY: &str = "FREEBUSY";
pub const KW_RESOURCES: &str = "RESOURCES";
pub const KW_TZOFFSETFROM: &str = "TZOFFSETFROM";
pub const KW_TZOFFSETTO: &str = "TZOFFSETTO";

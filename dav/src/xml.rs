// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! XML utilities for WebDAV/CalDAV/CardDAV processing.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::DavError;

/// XML namespaces used in `CalDAV` and `CardDAV`.
pub mod ns {
    /// `WebDAV` namespace.
    pub const DAV: &str = "DAV:";

    /// `CalDAV` namespace.
    pub const CALDAV: &str = "urn:ietf:params:xml:ns:caldav";

    /// `CardDAV` namespace.
    pub const CARDDAV: &str = "urn:ietf:params:xml:ns:carddav";

    /// Calendar server extensions, e.g. `getctag`.
    pub const CALENDARSERVER: &str = "http://calendarserver.org/ns/";

    /// Apple iCal extensions, e.g. `calendar-color`.
    pub const APPLE_ICAL: &str = "http://apple.com/ns/ical/";
}

/// A namespace together with the prefix request bodies bind it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `DAV:`
    Dav,
    /// `CalDAV`
    CalDav,
    /// `CardDAV`
    CardDav,
    /// Calendar server extensions
    CalendarServer,
    /// Apple iCal extensions
    AppleIcal,
}

impl Namespace {
    /// Prefix used in request bodies.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Dav => "D",
            Self::CalDav => "C",
            Self::CardDav => "CR",
            Self::CalendarServer => "CS",
            Self::AppleIcal => "A",
        }
    }

    /// Namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Dav => ns::DAV,
            Self::CalDav => ns::CALDAV,
            Self::CardDav => ns::CARDDAV,
            Self::CalendarServer => ns::CALENDARSERVER,
            Self::AppleIcal => ns::APPLE_ICAL,
        }
    }

    /// Qualified element name with this namespace's prefix.
    #[must_use]
    pub fn qualify(self, local: &str) -> String {
        format!("{}:{local}", self.prefix())
    }
}

/// Indented XML body writer over `quick_xml`.
pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    /// Starts a document with its XML declaration.
    pub fn new() -> Result<Self, DavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(Self { writer })
    }

    /// Opens the root element, declaring `DAV:` and every namespace in `namespaces`.
    pub fn root(&mut self, name: &str, namespaces: &[Namespace]) -> Result<(), DavError> {
        let mut root = BytesStart::new(name);
        let mut declared: Vec<Namespace> = Vec::with_capacity(namespaces.len() + 1);
        for namespace in std::iter::once(Namespace::Dav).chain(namespaces.iter().copied()) {
            if !declared.contains(&namespace) {
                declared.push(namespace);
                root.push_attribute((
                    format!("xmlns:{}", namespace.prefix()).as_str(),
                    namespace.uri(),
                ));
            }
        }
        self.writer.write_event(Event::Start(root))?;
        Ok(())
    }

    /// Opens an element.
    pub fn open(&mut self, name: &str) -> Result<(), DavError> {
        self.open_with(name, &[])
    }

    /// Opens an element with attributes.
    pub fn open_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), DavError> {
        let mut start = BytesStart::new(name);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    /// Closes an element.
    pub fn close(&mut self, name: &str) -> Result<(), DavError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes a self-closing element.
    pub fn empty(&mut self, name: &str) -> Result<(), DavError> {
        self.empty_with(name, &[])
    }

    /// Writes a self-closing element with attributes.
    pub fn empty_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), DavError> {
        let mut start = BytesStart::new(name);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// Writes escaped text inside the open element.
    pub fn text(&mut self, text: &str) -> Result<(), DavError> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// Writes an element holding escaped text.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<(), DavError> {
        self.open(name)?;
        self.text(text)?;
        self.close(name)
    }

    /// Finishes the document.
    pub fn finish(self) -> Result<String, DavError> {
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8(bytes)
            .map_err(|e| DavError::InvalidResponse(format!("UTF-8 error: {e}")))
    }
}

/// Resolves a general entity reference, `&name;`, to its text.
///
/// Only the predefined XML entities and character references are known; anything
/// else is kept as written.
pub(crate) fn resolve_entity(name: &str) -> String {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name.strip_prefix('#').and_then(|code| {
            match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse().ok(),
            }
            .and_then(char::from_u32)
        }),
    };
    resolved.map_or_else(|| format!("&{name};"), String::from)
}

/// Parses the code of an HTTP status line such as `HTTP/1.1 404 Not Found`.
pub(crate) fn parse_status_line(line: &str) -> Option<u16> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let code = if first.starts_with("HTTP/") {
        parts.next()?
    } else {
        first
    };
    code.parse().ok()
}

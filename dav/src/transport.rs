// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The seam between the client and the network.

use async_trait::async_trait;

use crate::error::DavError;
use crate::types::{ETag, Href};

/// HTTP methods used by `WebDAV`, `CalDAV` and `CardDAV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum DavMethod {
    /// Capability discovery.
    Options,
    /// Property retrieval.
    PropFind,
    /// Queries, multigets and `sync-collection`.
    Report,
    /// Calendar collection creation.
    MkCalendar,
    /// Property update.
    PropPatch,
    /// Object upload.
    Put,
    /// Object download.
    Get,
    /// Object or collection removal.
    Delete,
}

/// Value of the `Depth` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    /// The resource itself.
    Zero,
    /// The resource and its direct members.
    One,
    /// The resource and all descendants.
    Infinity,
}

impl Depth {
    /// Header value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity => "infinity",
        }
    }
}

/// A request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavRequest {
    /// The method.
    pub method: DavMethod,
    /// Target href, relative to the server base URL or absolute.
    pub path: Href,
    /// Extra headers, in order.
    pub headers: Vec<(String, String)>,
    /// The body, if any.
    pub body: Option<String>,
}

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

impl DavRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: DavMethod, path: Href) -> Self {
        Self {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the `Depth` header.
    #[must_use]
    pub fn depth(self, depth: Depth) -> Self {
        self.header("Depth", depth.as_str())
    }

    /// Guards the request with `If-Match`.
    #[must_use]
    pub fn if_match(self, etag: &ETag) -> Self {
        self.header("If-Match", etag.as_str())
    }

    /// Guards the request with `If-None-Match: *`, so it only creates.
    #[must_use]
    pub fn if_none_match_any(self) -> Self {
        self.header("If-None-Match", "*")
    }

    /// Sets the body and its content type.
    #[must_use]
    pub fn body(mut self, content_type: &str, body: String) -> Self {
        self.body = Some(body);
        self.header("Content-Type", content_type)
    }

    /// Sets an XML body.
    #[must_use]
    pub fn xml(self, body: String) -> Self {
        self.body(XML_CONTENT_TYPE, body)
    }

    /// First value of a header, case-insensitively.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// What a [`Transport`] got back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavReply {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, in order.
    pub headers: Vec<(String, String)>,
    /// Response body as text.
    pub body: String,
}

impl DavReply {
    /// Creates a reply without headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of a header, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The `ETag` header.
    #[must_use]
    pub fn etag(&self) -> Option<ETag> {
        self.header("ETag").map(ETag::from)
    }

    /// Whether the status is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Sends requests to the server.
///
/// Implementations report every status as a [`DavReply`]; mapping statuses to errors is
/// left to the caller. Retry and back-off belong here, not in the client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be sent or the reply not read.
    async fn send(&self, request: DavRequest) -> Result<DavReply, DavError>;
}

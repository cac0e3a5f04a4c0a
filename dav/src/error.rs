// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use davsync_codec::CodecError;

use crate::types::Href;

/// `CalDAV`/`CardDAV` client errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DavError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status the operation does not accept.
    #[error("Unexpected status {status} for {href}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Target of the request.
        href: Href,
        /// Response body or reason phrase.
        message: String,
    },

    /// Authentication error.
    #[error("Authentication failed with status {status}")]
    Auth {
        /// HTTP status code, 401 or 403.
        status: u16,
    },

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(Href),

    /// Precondition failed: the `ETag` guard of a write did not match.
    #[error("Precondition failed for {href}, current ETag: {}", .etag.as_deref().unwrap_or("unknown"))]
    Conflict {
        /// Target of the write.
        href: Href,
        /// Current `ETag` reported by the server, if any.
        etag: Option<String>,
    },

    /// The sync token is no longer accepted and a full sync is required.
    #[error("Sync token for {0} is no longer valid")]
    InvalidSyncToken(Href),

    /// XML parsing/writing error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Text in the XML document is not valid in its encoding.
    #[error("XML encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// I/O error while writing a request body.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// vCard/iCalendar conversion error.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The multistatus has no response describing the collection itself.
    #[error("Multistatus for {0} has no response describing the collection")]
    MissingCollectionResponse(Href),

    /// A request body cannot be built from the given parts.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response from server.
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server doesn't support required capability.
    #[error("Server doesn't support required capability: {0}")]
    UnsupportedCapability(String),
}

/// Why one member of a multistatus could not be converted.
///
/// A failed member is reported next to the converted ones and never fails the whole list.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    /// The member's status is neither success nor deletion.
    #[error("member status {0}")]
    Status(u16),

    /// The member carries no object data.
    #[error("member has no object data")]
    NoData,

    /// The object data could not be materialized.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

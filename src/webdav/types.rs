use anyhow::Result;
use bytes::Bytes;
use hyper::{Method, StatusCode};

use crate::webdav::names::{self, QualifiedName};

/// WebDAV Depth
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Depth {
    Zero,
    One,
}
impl Depth {
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
        }
    }
}

pub(crate) const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
pub(crate) const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// One request handed to a [`crate::webdav::Transport`].
#[derive(Debug, Clone)]
pub struct DavRequest {
    pub method: Method,
    /// Path relative to the transport's base URL, or an absolute `http(s)://` URL.
    pub target: String,
    pub depth: Option<Depth>,
    pub content_type: Option<&'static str>,
    pub body: Option<Bytes>,
}

impl DavRequest {
    pub fn propfind(target: impl Into<String>, depth: Depth, xml_body: String) -> Result<Self> {
        Ok(Self {
            method: Method::from_bytes(b"PROPFIND")?,
            target: target.into(),
            depth: Some(depth),
            content_type: Some(XML_CONTENT_TYPE),
            body: Some(Bytes::from(xml_body)),
        })
    }

    pub fn report(target: impl Into<String>, depth: Depth, xml_body: String) -> Result<Self> {
        Ok(Self {
            method: Method::from_bytes(b"REPORT")?,
            target: target.into(),
            depth: Some(depth),
            content_type: Some(XML_CONTENT_TYPE),
            body: Some(Bytes::from(xml_body)),
        })
    }

    pub fn put_calendar(target: impl Into<String>, ics: String) -> Self {
        Self {
            method: Method::PUT,
            target: target.into(),
            depth: None,
            content_type: Some(ICS_CONTENT_TYPE),
            body: Some(Bytes::from(ics)),
        }
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            target: target.into(),
            depth: None,
            content_type: None,
            body: None,
        }
    }

    /// Body as UTF-8 text, if any.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Aggregated (already decompressed) response returned by a transport.
#[derive(Debug, Clone)]
pub struct DavResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl DavResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The transport-level success flag: any 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Property name to text value, in order of first appearance.
///
/// Re-inserting a name replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: Vec<(QualifiedName, String)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: QualifiedName, value: String) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &str)> {
        self.entries.iter().map(|(n, v)| (n, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One `<response>` of a multi-status document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    /// Raw `<href>` exactly as sent by the server.
    pub uri: String,
    /// Response-level `<status>`, when the server sent one.
    pub status: Option<String>,
    pub properties: PropertyMap,
    /// Child elements of an accepted `DAV:resourcetype`, in document order.
    pub resource_types: Vec<QualifiedName>,
}

impl Resource {
    pub fn property(&self, name: &QualifiedName) -> Option<&str> {
        self.properties.get(name)
    }

    /// True when `DAV:resourcetype` holds a `calendar` element (case-insensitive).
    ///
    /// Only element names count, so `schedule-inbox` or a `calendarserver.org` namespace
    /// never mark a collection as a calendar.
    pub fn is_calendar(&self) -> bool {
        self.resource_types
            .iter()
            .any(|kind| kind.local_name().eq_ignore_ascii_case(names::CALENDAR.local_name()))
    }
}

/// Interpreted multi-status document.
#[derive(Debug, Clone, Default)]
pub struct MultiStatus {
    pub resources: Vec<Resource>,
    /// Top-level `<sync-token>` (RFC 6578), if present.
    pub sync_token: Option<String>,
}

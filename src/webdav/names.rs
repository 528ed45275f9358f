//! XML namespaces and element names used by WebDAV and CalDAV.

use std::borrow::Cow;
use std::fmt;

pub const DAV_NS: &str = "DAV:";
pub const CALDAV_NS: &str = "urn:ietf:params:xml:ns:caldav";
pub const CALENDARSERVER_NS: &str = "http://calendarserver.org/ns/";
pub const APPLE_ICAL_NS: &str = "http://apple.com/ns/ical/";

/// Namespace-qualified XML element name.
///
/// Catalog entries are `const`; names read from server responses own their strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    namespace: Cow<'static, str>,
    local: Cow<'static, str>,
}

impl QualifiedName {
    pub const fn new_static(namespace: &'static str, local: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            local: Cow::Borrowed(local),
        }
    }

    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Cow::Owned(namespace.into()),
            local: Cow::Owned(local.into()),
        }
    }

    /// Namespace URI, empty when the element was not bound to one.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Prefix used for this namespace in the request bodies we emit.
    pub(crate) fn prefix(&self) -> Option<&'static str> {
        match self.namespace.as_ref() {
            DAV_NS => Some("D"),
            CALDAV_NS => Some("C"),
            CALENDARSERVER_NS => Some("CS"),
            APPLE_ICAL_NS => Some("I"),
            _ => None,
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local)
    }
}

// DAV:
pub const MULTISTATUS: QualifiedName = QualifiedName::new_static(DAV_NS, "multistatus");
pub const RESPONSE: QualifiedName = QualifiedName::new_static(DAV_NS, "response");
pub const PROPSTAT: QualifiedName = QualifiedName::new_static(DAV_NS, "propstat");
pub const PROP: QualifiedName = QualifiedName::new_static(DAV_NS, "prop");
pub const HREF: QualifiedName = QualifiedName::new_static(DAV_NS, "href");
pub const STATUS: QualifiedName = QualifiedName::new_static(DAV_NS, "status");
pub const PROPFIND: QualifiedName = QualifiedName::new_static(DAV_NS, "propfind");
pub const ALLPROP: QualifiedName = QualifiedName::new_static(DAV_NS, "allprop");
pub const RESOURCE_TYPE: QualifiedName = QualifiedName::new_static(DAV_NS, "resourcetype");
pub const DISPLAY_NAME: QualifiedName = QualifiedName::new_static(DAV_NS, "displayname");
pub const OWNER: QualifiedName = QualifiedName::new_static(DAV_NS, "owner");
pub const GET_ETAG: QualifiedName = QualifiedName::new_static(DAV_NS, "getetag");
pub const GET_LAST_MODIFIED: QualifiedName =
    QualifiedName::new_static(DAV_NS, "getlastmodified");
pub const CREATION_DATE: QualifiedName = QualifiedName::new_static(DAV_NS, "creationdate");
pub const SYNC_TOKEN: QualifiedName = QualifiedName::new_static(DAV_NS, "sync-token");

// urn:ietf:params:xml:ns:caldav
pub const CALENDAR: QualifiedName = QualifiedName::new_static(CALDAV_NS, "calendar");
pub const CALENDAR_QUERY: QualifiedName = QualifiedName::new_static(CALDAV_NS, "calendar-query");
pub const CALENDAR_DATA: QualifiedName = QualifiedName::new_static(CALDAV_NS, "calendar-data");
pub const CALENDAR_DESCRIPTION: QualifiedName =
    QualifiedName::new_static(CALDAV_NS, "calendar-description");
pub const CALENDAR_TIMEZONE: QualifiedName =
    QualifiedName::new_static(CALDAV_NS, "calendar-timezone");
pub const SUPPORTED_CALENDAR_COMPONENT_SET: QualifiedName =
    QualifiedName::new_static(CALDAV_NS, "supported-calendar-component-set");
pub const FILTER: QualifiedName = QualifiedName::new_static(CALDAV_NS, "filter");
pub const COMP_FILTER: QualifiedName = QualifiedName::new_static(CALDAV_NS, "comp-filter");

// http://calendarserver.org/ns/
pub const GET_CTAG: QualifiedName = QualifiedName::new_static(CALENDARSERVER_NS, "getctag");

// http://apple.com/ns/ical/
pub const CALENDAR_COLOR: QualifiedName =
    QualifiedName::new_static(APPLE_ICAL_NS, "calendar-color");
pub const CALENDAR_ORDER: QualifiedName =
    QualifiedName::new_static(APPLE_ICAL_NS, "calendar-order");

/// Component name used in the calendar-query filter.
pub const VCALENDAR: &str = "VCALENDAR";

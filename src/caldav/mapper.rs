//! Translation of interpreted WebDAV resources into [`Calendar`]s and [`CalendarEvent`]s.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use tracing::debug;

use crate::caldav::ics::decode_events;
use crate::caldav::types::{Calendar, CalendarEvent};
use crate::webdav::names::{self, CALDAV_NS, QualifiedName};
use crate::webdav::types::Resource;

type Setter = fn(&mut Calendar, &str);

/// `creationdate` layout used by most CalDAV servers.
const CREATION_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Property name to [`Calendar`] field. Names not listed here are ignored.
static CALENDAR_PROPERTIES: &[(QualifiedName, Setter)] = &[
    (names::DISPLAY_NAME, |cal, v| cal.display_name = Some(v.to_string())),
    (names::OWNER, |cal, v| cal.owner = Some(owner_identifier(v))),
    (names::GET_ETAG, |cal, v| cal.etag = Some(v.to_string())),
    (names::GET_LAST_MODIFIED, |cal, v| {
        cal.last_modified = parse_last_modified(v)
    }),
    (names::SYNC_TOKEN, |cal, v| cal.sync_token = Some(v.to_string())),
    (names::CREATION_DATE, |cal, v| {
        cal.creation_date = parse_creation_date(v)
    }),
    (names::GET_CTAG, |cal, v| cal.ctag = Some(v.to_string())),
    (names::CALENDAR_DESCRIPTION, |cal, v| {
        cal.description = Some(v.to_string())
    }),
    (names::CALENDAR_TIMEZONE, |cal, v| {
        cal.time_zone = Some(v.to_string())
    }),
    (names::CALENDAR_COLOR, |cal, v| cal.color = Some(v.to_string())),
    // Some servers report the color in the CalDAV namespace.
    (
        QualifiedName::new_static(CALDAV_NS, "calendar-color"),
        |cal, v| cal.color = Some(v.to_string()),
    ),
    (names::CALENDAR_ORDER, |cal, v| cal.order = v.parse().ok()),
];

fn setter_for(name: &QualifiedName) -> Option<Setter> {
    CALENDAR_PROPERTIES
        .iter()
        .find(|(known, _)| known == name)
        .map(|(_, setter)| *setter)
}

/// Build a [`Calendar`] from a PROPFIND resource.
///
/// Returns `None` unless the resource's `resourcetype` holds a `calendar` element. The calendar's
/// uri is the resource href, or `requested_uri` when the server sent none.
pub fn to_calendar(resource: &Resource, requested_uri: &str) -> Option<Calendar> {
    if !resource.is_calendar() {
        return None;
    }

    let href = resource.uri.trim();
    let uri = if href.is_empty() { requested_uri } else { href };
    let mut calendar = Calendar::new(uri);

    for (name, value) in resource.properties.iter() {
        if let Some(set) = setter_for(name) {
            set(&mut calendar, value);
        }
    }
    Some(calendar)
}

/// Decode the `calendar-data` of every resource into events.
///
/// A resource whose body does not decode is skipped. Events inherit the resource's
/// `getetag`.
pub fn to_events(resources: &[Resource]) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    for resource in resources {
        let Some(data) = resource.property(&names::CALENDAR_DATA) else {
            continue;
        };
        match decode_events(data) {
            Ok(decoded) => {
                let etag = resource.property(&names::GET_ETAG);
                events.extend(decoded.into_iter().map(|mut event| {
                    event.etag = etag.map(str::to_string);
                    event
                }));
            }
            Err(err) => {
                debug!(href = %resource.uri, error = %err, "skipping undecodable calendar-data");
            }
        }
    }
    events
}

/// Bare principal identifier from an `owner` value.
///
/// Accepts either the identifier itself or an href wrapper such as
/// `<href>/principals/users/alice/</href>`.
pub(crate) fn owner_identifier(raw: &str) -> String {
    let Some(open) = raw.find("<href") else {
        return raw.trim().to_string();
    };
    let tag = &raw[open..];
    let Some(close) = tag.find('>') else {
        return raw.trim().to_string();
    };
    let inner = &tag[close + 1..];
    let end = inner.find('<').unwrap_or(inner.len());
    inner[..end].trim().to_string()
}

fn parse_creation_date(value: &str) -> Option<DateTime<Utc>> {
    let parsed = NaiveDateTime::parse_from_str(value, CREATION_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)));
    match parsed {
        Ok(date) => Some(date),
        Err(err) => {
            debug!(value, error = %err, "ignoring unparsable creationdate");
            None
        }
    }
}

fn parse_last_modified(value: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc2822(value).or_else(|_| DateTime::parse_from_rfc3339(value)) {
        Ok(date) => Some(date),
        Err(err) => {
            debug!(value, error = %err, "ignoring unparsable getlastmodified");
            None
        }
    }
}

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// A calendar collection, freshly materialized on every fetch.
///
/// `uri` never ends in `/` and `uid` is always its last non-empty segment; both are
/// only set through [`Calendar::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    uri: String,
    uid: String,
    pub display_name: Option<String>,
    /// Principal identifier, with any `<href>` wrapper removed.
    pub owner: Option<String>,
    pub etag: Option<String>,
    pub sync_token: Option<String>,
    /// CalendarServer `getctag`.
    pub ctag: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub creation_date: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<FixedOffset>>,
    pub time_zone: Option<String>,
    pub events: Vec<CalendarEvent>,
}

impl Calendar {
    pub fn new(uri: &str) -> Self {
        let uri = uri.trim_end_matches('/').to_string();
        let uid = uid_from_uri(&uri);
        Self {
            uri,
            uid,
            display_name: None,
            owner: None,
            etag: None,
            sync_token: None,
            ctag: None,
            color: None,
            description: None,
            order: None,
            creation_date: None,
            last_modified: None,
            time_zone: None,
            events: Vec::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
}

/// Last non-empty `/`-separated segment, or the whole input when it has none.
pub(crate) fn uid_from_uri(uri: &str) -> String {
    uri.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(uri)
        .to_string()
}

/// Start or end of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`).
    Date(NaiveDate),
    Utc(DateTime<Utc>),
    /// Wall-clock time in a named zone (`TZID=`).
    Zoned {
        date_time: NaiveDateTime,
        tzid: String,
    },
    /// Wall-clock time without any zone.
    Floating(NaiveDateTime),
}

impl EventTime {
    pub fn zoned(date_time: NaiveDateTime, tzid: impl Into<String>) -> Self {
        EventTime::Zoned {
            date_time,
            tzid: tzid.into(),
        }
    }

    /// Time zone identifier; `UTC` for UTC values, `None` for dates and floating times.
    pub fn tzid(&self) -> Option<&str> {
        match self {
            EventTime::Utc(_) => Some("UTC"),
            EventTime::Zoned { tzid, .. } => Some(tzid),
            EventTime::Date(_) | EventTime::Floating(_) => None,
        }
    }
}

/// One `VEVENT`.
///
/// `uid` is the join key to the server resource and must stay stable across updates.
/// `url` is only a cache: a client never writes it, callers may store a resolved URL with
/// [`CalendarEvent::with_url`]. Not safe to share mutably between concurrent callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub url: Option<String>,
    /// ETag of the resource the event was decoded from.
    pub etag: Option<String>,
}

impl CalendarEvent {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_times(mut self, start: EventTime, end: EventTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

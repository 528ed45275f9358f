//! Calendar discovery and event retrieval.
//!
//! Transport failures never escape this module: they are logged and treated as an empty
//! response, so callers only ever see `None` or an empty `Vec`.

use anyhow::Result;
use tracing::{debug, warn};

use crate::caldav::mapper::{to_calendar, to_events};
use crate::caldav::types::{Calendar, CalendarEvent};
use crate::webdav::names::VCALENDAR;
use crate::webdav::streaming::interpret_response;
use crate::webdav::transport::Transport;
use crate::webdav::types::{DavRequest, Depth, Resource};
use crate::webdav::xml::{
    PropfindRequest, build_calendar_query_body, build_propfind_body, calendar_discovery_props,
};

/// Read-side operations over a borrowed [`Transport`].
pub struct Discovery<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> Discovery<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch one calendar collection and all of its events.
    pub async fn fetch_calendar(&self, uri: &str) -> Option<Calendar> {
        let body = build_propfind_body(&PropfindRequest::AllProp);
        let resources = self
            .exchange(DavRequest::propfind(uri, Depth::Zero, body))
            .await;

        let Some(mut calendar) = resources
            .iter()
            .find(|resource| resource.is_calendar())
            .and_then(|resource| to_calendar(resource, uri))
        else {
            debug!(uri, "no calendar resource found");
            return None;
        };

        calendar.events = self.fetch_events(calendar.uri()).await;
        Some(calendar)
    }

    /// Run a `calendar-query` REPORT and decode every returned event.
    pub async fn fetch_events(&self, calendar_uri: &str) -> Vec<CalendarEvent> {
        let body = build_calendar_query_body(VCALENDAR);
        let resources = self
            .exchange(DavRequest::report(calendar_uri, Depth::One, body))
            .await;
        let events = to_events(&resources);
        debug!(calendar = calendar_uri, count = events.len(), "fetched events");
        events
    }

    /// Every calendar below the principal root. Calendars that fail to load are skipped.
    pub async fn fetch_all_calendars(&self) -> Vec<Calendar> {
        let mut calendars = Vec::new();
        for uri in self.calendar_uris().await {
            if let Some(calendar) = self.fetch_calendar(&uri).await {
                calendars.push(calendar);
            }
        }
        calendars
    }

    /// The first calendar below the principal root that loads successfully.
    pub async fn fetch_default_calendar(&self) -> Option<Calendar> {
        for uri in self.calendar_uris().await {
            if let Some(calendar) = self.fetch_calendar(&uri).await {
                return Some(calendar);
            }
        }
        None
    }

    /// Hrefs of the calendar collections listed by a `Depth: 1` PROPFIND of the root.
    async fn calendar_uris(&self) -> Vec<String> {
        let body = build_propfind_body(&calendar_discovery_props());
        self.exchange(DavRequest::propfind("", Depth::One, body))
            .await
            .into_iter()
            .filter(Resource::is_calendar)
            .map(|resource| resource.uri)
            .collect()
    }

    async fn exchange(&self, request: Result<DavRequest>) -> Vec<Resource> {
        let request = match request {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "could not build request");
                return Vec::new();
            }
        };
        let method = request.method.clone();
        let target = request.target.clone();
        match self.transport.execute(request).await {
            Ok(response) => interpret_response(&response),
            Err(err) => {
                warn!(%method, %target, error = %err, "transport failure, treating as empty");
                Vec::new()
            }
        }
    }
}

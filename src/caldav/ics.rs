//! iCalendar (RFC 5545) encoding and decoding of [`CalendarEvent`]s.

use anyhow::{Result, anyhow};
use icalendar::{
    Calendar as IcsCalendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime,
    Event, EventLike,
};
use tracing::debug;

use crate::caldav::types::{CalendarEvent, EventTime};

/// Decode every `VEVENT` found in an ICS document.
pub fn decode_events(ics: &str) -> Result<Vec<CalendarEvent>> {
    let calendar = ics
        .parse::<IcsCalendar>()
        .map_err(|e| anyhow!("invalid iCalendar data: {e}"))?;

    let events: Vec<_> = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(from_ics_event(event)),
            _ => None,
        })
        .collect();

    debug!(count = events.len(), "decoded events");
    Ok(events)
}

/// Encode a single event wrapped in its own `VCALENDAR`.
pub fn encode_event(event: &CalendarEvent) -> String {
    let mut calendar = IcsCalendar::new();
    calendar.push(to_ics_event(event));
    calendar.done().to_string()
}

fn from_ics_event(event: &Event) -> CalendarEvent {
    CalendarEvent {
        uid: event.get_uid().unwrap_or_default().to_string(),
        summary: event.get_summary().map(str::to_string),
        description: event.get_description().map(str::to_string),
        location: event.get_location().map(str::to_string),
        start: event.get_start().map(from_ics_time),
        end: event.get_end().map(from_ics_time),
        url: event.property_value("URL").map(str::to_string),
        etag: None,
    }
}

fn to_ics_event(source: &CalendarEvent) -> Event {
    let mut event = Event::new();
    if !source.uid.is_empty() {
        event.uid(&source.uid);
    }
    if let Some(summary) = &source.summary {
        event.summary(summary);
    }
    if let Some(description) = &source.description {
        event.description(description);
    }
    if let Some(location) = &source.location {
        event.location(location);
    }
    if let Some(start) = &source.start {
        event.starts(to_ics_time(start));
    }
    if let Some(end) = &source.end {
        event.ends(to_ics_time(end));
    }
    event.done()
}

fn from_ics_time(value: DatePerhapsTime) -> EventTime {
    match value {
        DatePerhapsTime::Date(date) => EventTime::Date(date),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => EventTime::Utc(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            EventTime::Floating(naive)
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            EventTime::Zoned { date_time, tzid }
        }
    }
}

fn to_ics_time(value: &EventTime) -> DatePerhapsTime {
    match value {
        EventTime::Date(date) => DatePerhapsTime::Date(*date),
        EventTime::Utc(dt) => DatePerhapsTime::DateTime(CalendarDateTime::Utc(*dt)),
        EventTime::Floating(naive) => DatePerhapsTime::DateTime(CalendarDateTime::Floating(*naive)),
        EventTime::Zoned { date_time, tzid } => {
            DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone {
                date_time: *date_time,
                tzid: tzid.clone(),
            })
        }
    }
}

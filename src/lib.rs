//! CalDAV client library for Rust.
//!
//! Discovers the calendars of a single authenticated principal, materializes their events
//! and creates, updates or deletes individual events. Built on hyper 1.x, rustls, tokio,
//! quick-xml and icalendar.
//!
//! # Features
//!
//! - PROPFIND / calendar-query REPORT request bodies and namespace-aware multi-status parsing
//! - Static property table mapping WebDAV properties onto [`Calendar`]
//! - iCalendar encoding/decoding of [`CalendarEvent`]s
//! - Pluggable [`Transport`], with a hyper-based default (Basic auth, timeouts, br/zstd/gzip)
//!
//! Failures on read paths surface as `None` or an empty `Vec`, and on write paths as
//! `false`. Only invalid arguments and client setup return an [`Error`].
//!
//! # Examples
//!
//! ## Listing calendars
//!
//! ```no_run
//! use calendav::CalDavClient;
//!
//! #[tokio::main]
//! async fn main() -> calendav::Result<()> {
//!     let client = CalDavClient::new(
//!         "https://caldav.example.com/dav/calendars/user/",
//!         Some("username"),
//!         Some("password"),
//!     )?;
//!
//!     for calendar in client.get_all_calendars().await {
//!         println!("{}: {:?}", calendar.uid(), calendar.display_name);
//!         for event in &calendar.events {
//!             println!("  {} {:?}", event.uid, event.summary);
//!         }
//!     }
//!
//!     if let Some(work) = client.get_calendar_by_uid("work").await? {
//!         println!("work has {} events", work.events.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Event Operations
//!
//! ```no_run
//! use calendav::{CalDavClient, CalendarEvent, EventTime};
//! use chrono::{TimeZone, Utc};
//!
//! #[tokio::main]
//! async fn main() -> calendav::Result<()> {
//!     let client = CalDavClient::new(
//!         "https://caldav.example.com/dav/calendars/user/",
//!         Some("username"),
//!         Some("password"),
//!     )?;
//!
//!     let event = CalendarEvent::new("standup-2025-03-01")
//!         .with_summary("Standup")
//!         .with_times(
//!             EventTime::Utc(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()),
//!             EventTime::Utc(Utc.with_ymd_and_hms(2025, 3, 1, 9, 15, 0).unwrap()),
//!         );
//!
//!     // PUT to <base>/default/standup-2025-03-01.ics
//!     let url = client.resolve_event_url(&event, "default");
//!     let event = event.with_url(url);
//!     if client.add_or_update_event(&event, "default").await {
//!         client.delete_event(&event, "default").await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration from the environment
//!
//! ```no_run
//! use calendav::{CalDavClient, ClientConfig};
//!
//! # fn example() -> calendav::Result<()> {
//! // CALDAV_URL, CALDAV_USERNAME, CALDAV_PASSWORD, CALDAV_TIMEOUT_SECS
//! let config = ClientConfig::from_env()?;
//! let client = CalDavClient::from_config(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod caldav;
pub mod common;
pub mod webdav;

pub use caldav::{
    CalDavClient, Calendar, CalendarEvent, EventTime, decode_events, encode_event,
    resolve_event_url,
};
pub use common::{ClientConfig, Error, Result};
pub use webdav::{
    DavRequest, DavResponse, Depth, HyperTransport, PropertyMap, QualifiedName, Resource,
    Transport,
};

pub mod client;
pub mod discovery;
pub mod events;
pub mod ics;
pub mod mapper;
pub mod types;

pub use client::CalDavClient;
pub use discovery::Discovery;
pub use events::{EventMutator, resolve_event_url};
pub use ics::{decode_events, encode_event};
pub use mapper::{to_calendar, to_events};
pub use types::{Calendar, CalendarEvent, EventTime};

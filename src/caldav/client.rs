use hyper::Uri;

use crate::caldav::discovery::Discovery;
use crate::caldav::events::EventMutator;
use crate::caldav::types::{Calendar, CalendarEvent};
use crate::common::config::ClientConfig;
use crate::common::error::{Error, Result};
use crate::webdav::transport::{HyperTransport, Transport};

/// CalDAV client for a single authenticated principal.
///
/// Read operations return `None` or an empty `Vec` when the server cannot be reached or
/// answers with an error; write operations return `false`. Only argument validation
/// produces an [`Error`].
///
/// Cloning `CalDavClient<HyperTransport>` is cheap and reuses the same connection pool.
#[derive(Clone)]
pub struct CalDavClient<T = HyperTransport> {
    transport: T,
}

impl CalDavClient<HyperTransport> {
    /// Create a client for `base_url` with optional **Basic** credentials.
    ///
    /// The base URL should point at the principal's calendar home; a trailing `/` is
    /// added when missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] if `base_url` is not an absolute `http(s)` URL and
    /// [`Error::Transport`] if the HTTP client cannot be set up.
    ///
    /// # Example
    /// ```no_run
    /// use calendav::CalDavClient;
    ///
    /// # fn example() -> calendav::Result<()> {
    /// let client = CalDavClient::new(
    ///     "https://cal.example.com/dav/calendars/user01/",
    ///     Some("user01"),
    ///     Some("secret"),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(base_url: &str, username: Option<&str>, password: Option<&str>) -> Result<Self> {
        let mut config = ClientConfig::new(base_url);
        if let (Some(user), Some(pass)) = (username, password) {
            config = config.with_credentials(user, pass);
        }
        Self::from_config(&config)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        validate_base_url(&config.base_url)?;
        Ok(Self::with_transport(HyperTransport::new(config)?))
    }
}

impl<T: Transport> CalDavClient<T> {
    /// Use a custom [`Transport`], e.g. a recording stub in tests.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    fn discovery(&self) -> Discovery<'_, T> {
        Discovery::new(&self.transport)
    }

    fn mutator(&self) -> EventMutator<'_, T> {
        EventMutator::new(&self.transport)
    }

    /// All calendars below the base URL, each with its events.
    ///
    /// # Example
    /// ```no_run
    /// # use calendav::CalDavClient;
    /// # async fn demo(client: &CalDavClient) {
    /// for calendar in client.get_all_calendars().await {
    ///     println!("{} ({} events)", calendar.uid(), calendar.events.len());
    /// }
    /// # }
    /// ```
    pub async fn get_all_calendars(&self) -> Vec<Calendar> {
        self.discovery().fetch_all_calendars().await
    }

    /// Fetch the calendar whose collection is `uid`, relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a blank `uid`, before any request is sent.
    pub async fn get_calendar_by_uid(&self, uid: &str) -> Result<Option<Calendar>> {
        if uid.trim().is_empty() {
            return Err(Error::blank("uid"));
        }
        Ok(self.discovery().fetch_calendar(uid).await)
    }

    /// The first calendar below the base URL that can be loaded.
    pub async fn get_default_calendar(&self) -> Option<Calendar> {
        self.discovery().fetch_default_calendar().await
    }

    /// Create or replace `event` in calendar `calendar_id`.
    ///
    /// The request is unconditional; the last writer wins.
    pub async fn add_or_update_event(&self, event: &CalendarEvent, calendar_id: &str) -> bool {
        self.mutator().add_or_update(event, calendar_id).await
    }

    pub async fn delete_event(&self, event: &CalendarEvent, calendar_id: &str) -> bool {
        self.mutator().delete(event, calendar_id).await
    }

    /// URL that [`Self::add_or_update_event`] and [`Self::delete_event`] would target.
    ///
    /// Store it with [`CalendarEvent::with_url`] to pin the event to that resource.
    pub fn resolve_event_url(&self, event: &CalendarEvent, calendar_id: &str) -> String {
        self.mutator().resolve_url(event, calendar_id)
    }
}

fn validate_base_url(url: &str) -> Result<()> {
    let invalid = |reason: String| Error::InvalidBaseUrl {
        url: url.to_string(),
        reason,
    };
    let uri = url.parse::<Uri>().map_err(|e| invalid(e.to_string()))?;
    match uri.scheme_str() {
        Some("http") | Some("https") if uri.authority().is_some() => Ok(()),
        _ => Err(invalid("expected an absolute http(s) url".to_string())),
    }
}

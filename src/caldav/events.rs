//! Event creation, update and deletion.

use tracing::{debug, warn};

use crate::caldav::ics::encode_event;
use crate::caldav::types::CalendarEvent;
use crate::webdav::transport::Transport;
use crate::webdav::types::DavRequest;

const ICS_SUFFIX: &str = ".ics";

/// Canonical URL of `event` inside calendar `calendar_id`.
///
/// A missing url, or one outside `base_url`, is replaced by `base_url/calendar_id/uid.ics`.
/// A url not ending in `.ics` gets `uid.ics` appended. The event itself is left untouched.
pub fn resolve_event_url(base_url: &str, event: &CalendarEvent, calendar_id: &str) -> String {
    let file_name = format!("{}{ICS_SUFFIX}", event.uid);

    let url = match event.url.as_deref() {
        Some(url) if url.starts_with(base_url) => url.to_string(),
        _ => combine_uri(&[base_url, calendar_id, &file_name]),
    };

    if url.ends_with(ICS_SUFFIX) {
        url
    } else {
        combine_uri(&[&url, &file_name])
    }
}

/// Join `parts` with `/`, collapsing repeated slashes outside the `scheme://` separator.
pub(crate) fn combine_uri(parts: &[&str]) -> String {
    let joined = parts.join("/");
    let (scheme, rest) = match joined.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, joined.as_str()),
    };

    let mut out = String::with_capacity(joined.len());
    if let Some(scheme) = scheme {
        out.push_str(scheme);
        out.push_str("://");
    }
    let mut previous_slash = false;
    for ch in rest.chars() {
        let slash = ch == '/';
        if !(slash && previous_slash) {
            out.push(ch);
        }
        previous_slash = slash;
    }
    out
}

/// Write-side operations over a borrowed [`Transport`].
///
/// No `If-Match` precondition is sent: concurrent writers overwrite each other.
pub struct EventMutator<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> EventMutator<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn resolve_url(&self, event: &CalendarEvent, calendar_id: &str) -> String {
        resolve_event_url(self.transport.base_url(), event, calendar_id)
    }

    /// PUT `event` as a calendar object holding only that event.
    pub async fn add_or_update(&self, event: &CalendarEvent, calendar_id: &str) -> bool {
        let url = self.resolve_url(event, calendar_id);
        let body = encode_event(event);
        self.succeeds(DavRequest::put_calendar(url, body)).await
    }

    pub async fn delete(&self, event: &CalendarEvent, calendar_id: &str) -> bool {
        let url = self.resolve_url(event, calendar_id);
        self.succeeds(DavRequest::delete(url)).await
    }

    async fn succeeds(&self, request: DavRequest) -> bool {
        let method = request.method.clone();
        let target = request.target.clone();
        match self.transport.execute(request).await {
            Ok(response) => {
                debug!(%method, %target, status = %response.status, "event mutation");
                response.is_success()
            }
            Err(err) => {
                warn!(%method, %target, error = %err, "event mutation failed");
                false
            }
        }
    }
}

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use calendav::{DavRequest, DavResponse, Transport};
use hyper::StatusCode;
use tracing_subscriber::EnvFilter;

pub const BASE: &str = "http://host/dav/";

/// Transport that records every request and replays queued responses in order.
///
/// Once the queue is exhausted every call fails like an unreachable server would.
pub struct StubTransport {
    base_url: String,
    responses: Mutex<VecDeque<Result<DavResponse>>>,
    requests: Mutex<Vec<DavRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        init_tracing();
        Self {
            base_url: BASE.to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        let response = DavResponse::new(
            StatusCode::from_u16(status).expect("valid status"),
            body.into(),
        );
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, message: &'static str) -> Self {
        self.responses.lock().unwrap().push_back(Err(anyhow!(message)));
        self
    }

    pub fn requests(&self) -> Vec<DavRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for StubTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, request: DavRequest) -> Result<DavResponse> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(anyhow!("no response queued")))
    }
}

/// Route library logs to the test output; `RUST_LOG=calendav=debug` shows every request.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A `207` body describing one collection.
pub fn collection_multistatus(href: &str, resource_type: &str, props: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:" xmlns:cal="urn:ietf:params:xml:ns:caldav" xmlns:cs="http://calendarserver.org/ns/">
  <d:response>
    <d:href>{href}</d:href>
    <d:propstat>
      <d:prop>
        <d:resourcetype>{resource_type}</d:resourcetype>
        {props}
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#
    )
}

pub fn calendar_multistatus(href: &str, props: &str) -> String {
    collection_multistatus(href, "<d:collection/><cal:calendar/>", props)
}

/// A `207` body listing the given collections as a `Depth: 1` PROPFIND of the root would.
pub fn root_listing(calendar_hrefs: &[&str]) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:" xmlns:cal="urn:ietf:params:xml:ns:caldav">
  <d:response>
    <d:href>/dav/</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>"#,
    );
    for href in calendar_hrefs {
        body.push_str(&format!(
            r#"
  <d:response>
    <d:href>{href}</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><d:collection/><cal:calendar/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>"#
        ));
    }
    body.push_str("\n</d:multistatus>");
    body
}

pub fn event_ics(uid: &str, summary: &str) -> String {
    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Test//Test//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:20250101T000000Z\r\n\
         DTSTART:20250205T100000Z\r\n\
         DTEND:20250205T110000Z\r\n\
         SUMMARY:{summary}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}

/// A `207` REPORT body with one `calendar-data` resource per `(href, etag, ics)`.
pub fn report_multistatus(objects: &[(&str, &str, String)]) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:" xmlns:cal="urn:ietf:params:xml:ns:caldav">"#,
    );
    for (href, etag, ics) in objects {
        body.push_str(&format!(
            r#"
  <d:response>
    <d:href>{href}</d:href>
    <d:propstat>
      <d:prop>
        <d:getetag>{etag}</d:getetag>
        <cal:calendar-data><![CDATA[{ics}]]></cal:calendar-data>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>"#
        ));
    }
    body.push_str("\n</d:multistatus>");
    body
}

use calendav::{CalDavClient, CalendarEvent};
use hyper::Method;

use crate::support::{BASE, StubTransport};

fn stub_client(stub: StubTransport) -> CalDavClient<StubTransport> {
    CalDavClient::with_transport(stub)
}

#[tokio::test]
async fn add_puts_single_event_under_calendar_id() {
    let client = stub_client(StubTransport::new().respond(201, ""));
    let event = CalendarEvent::new("evt1").with_summary("S");

    assert!(client.add_or_update_event(&event, "default").await);

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    let put = &requests[0];
    assert_eq!(put.method, Method::PUT);
    assert_eq!(put.target, "http://host/dav/default/evt1.ics");
    assert!(put.content_type.unwrap().starts_with("text/calendar"));

    let body = put.body_text().unwrap();
    assert_eq!(body.matches("BEGIN:VEVENT").count(), 1);
    assert!(body.contains("UID:evt1"));
    assert!(body.contains("SUMMARY:S"));
    // the caller's event is not modified
    assert!(event.url.is_none());
}

#[tokio::test]
async fn delete_uses_resolved_url_unchanged() {
    let client = stub_client(StubTransport::new().respond(204, ""));
    let event = CalendarEvent::new("evt1").with_url("http://host/dav/default/evt1.ics");

    assert!(client.delete_event(&event, "other").await);

    let requests = client.transport().requests();
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(requests[0].target, "http://host/dav/default/evt1.ics");
    assert!(requests[0].body.is_none());
}

#[tokio::test]
async fn delete_without_url_synthesizes_one() {
    let client = stub_client(StubTransport::new().respond(204, ""));
    assert!(client.delete_event(&CalendarEvent::new("x"), "work").await);
    assert_eq!(client.transport().requests()[0].target, "http://host/dav/work/x.ics");
}

#[tokio::test]
async fn failures_are_reported_as_false() {
    let event = CalendarEvent::new("evt1");

    let client = stub_client(StubTransport::new().respond(412, "Precondition Failed"));
    assert!(!client.add_or_update_event(&event, "default").await);

    let client = stub_client(StubTransport::new().fail("connection reset"));
    assert!(!client.delete_event(&event, "default").await);
}

#[tokio::test]
async fn update_reuses_cached_url() {
    let client = stub_client(StubTransport::new().respond(201, "").respond(204, ""));
    let event = CalendarEvent::new("evt1").with_summary("v1");

    let url = client.resolve_event_url(&event, "default");
    let event = event.with_url(url.clone()).with_summary("v2");
    assert!(client.add_or_update_event(&event, "ignored").await);
    assert!(client.add_or_update_event(&event, "ignored").await);

    let targets: Vec<String> = client
        .transport()
        .requests()
        .into_iter()
        .map(|r| r.target)
        .collect();
    assert_eq!(targets, vec![url.clone(), url]);
}

#[test]
fn resolving_twice_is_idempotent() {
    let client = stub_client(StubTransport::new());
    let event = CalendarEvent::new("evt1");

    let first = client.resolve_event_url(&event, "default");
    let second = client.resolve_event_url(&event.clone().with_url(first.clone()), "default");
    assert_eq!(first, second);
    assert!(first.starts_with(BASE));
    assert_eq!(client.transport().calls(), 0);
}

#[test]
fn url_missing_suffix_gets_uid_appended() {
    let client = stub_client(StubTransport::new());
    let event = CalendarEvent::new("evt1").with_url("http://host/dav/default");
    assert_eq!(
        client.resolve_event_url(&event, "ignored"),
        "http://host/dav/default/evt1.ics"
    );
}

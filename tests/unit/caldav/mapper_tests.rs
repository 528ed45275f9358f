use calendav::caldav::{to_calendar, to_events};
use calendav::webdav::names::{self, APPLE_ICAL_NS, QualifiedName};
use calendav::webdav::{Resource, parse_multistatus_bytes};
use chrono::{Datelike, TimeZone, Utc};

use crate::support::{calendar_multistatus, collection_multistatus, event_ics, report_multistatus};

fn single_resource(xml: &str) -> Resource {
    let mut parsed = parse_multistatus_bytes(xml.as_bytes()).unwrap();
    assert_eq!(parsed.resources.len(), 1);
    parsed.resources.remove(0)
}

#[test]
fn maps_every_known_property() {
    let xml = calendar_multistatus(
        "/dav/calendars/alice/work/",
        r##"<d:displayname>Work</d:displayname>
        <d:owner><d:href>/principals/alice/</d:href></d:owner>
        <d:getetag>"etag-1"</d:getetag>
        <d:getlastmodified>Tue, 15 Nov 1994 12:45:26 GMT</d:getlastmodified>
        <d:sync-token>http://example.com/sync/7</d:sync-token>
        <d:creationdate>20240102T030405Z</d:creationdate>
        <cs:getctag>ctag-9</cs:getctag>
        <cal:calendar-description>Team calendar</cal:calendar-description>
        <cal:calendar-timezone>Europe/Paris</cal:calendar-timezone>
        <ical:calendar-color xmlns:ical="http://apple.com/ns/ical/">#00FF00</ical:calendar-color>
        <ical:calendar-order xmlns:ical="http://apple.com/ns/ical/">3</ical:calendar-order>"##,
    );
    let calendar = to_calendar(&single_resource(&xml), "work").unwrap();

    assert_eq!(calendar.uri(), "/dav/calendars/alice/work");
    assert_eq!(calendar.uid(), "work");
    assert_eq!(calendar.display_name.as_deref(), Some("Work"));
    assert_eq!(calendar.owner.as_deref(), Some("/principals/alice/"));
    assert_eq!(calendar.etag.as_deref(), Some("\"etag-1\""));
    assert_eq!(calendar.sync_token.as_deref(), Some("http://example.com/sync/7"));
    assert_eq!(calendar.ctag.as_deref(), Some("ctag-9"));
    assert_eq!(calendar.description.as_deref(), Some("Team calendar"));
    assert_eq!(calendar.time_zone.as_deref(), Some("Europe/Paris"));
    assert_eq!(calendar.color.as_deref(), Some("#00FF00"));
    assert_eq!(calendar.order, Some(3));
    assert_eq!(
        calendar.creation_date,
        Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    );
    assert_eq!(calendar.last_modified.map(|d| d.year()), Some(1994));
    assert!(calendar.events.is_empty());
}

#[test]
fn non_calendar_resource_is_rejected() {
    let xml = collection_multistatus(
        "/dav/calendars/alice/inbox/",
        "<d:collection/><cal:schedule-inbox/>",
        "<d:displayname>Inbox</d:displayname>",
    );
    assert!(to_calendar(&single_resource(&xml), "inbox").is_none());
    assert!(to_calendar(&Resource::default(), "anything").is_none());
}

#[test]
fn uid_is_last_segment_of_trimmed_uri() {
    for (href, uid) in [
        ("calendars/default/", "default"),
        ("/dav/calendars/alice/personal", "personal"),
        ("/a//b//", "b"),
    ] {
        let calendar = to_calendar(&single_resource(&calendar_multistatus(href, "")), href).unwrap();
        assert_eq!(calendar.uid(), uid, "href {href}");
        assert!(!calendar.uri().ends_with('/'));
    }
}

#[test]
fn server_href_wins_over_requested_uri() {
    // Servers may answer a relative request with the canonical absolute path.
    let xml = calendar_multistatus("/dav/calendars/alice/work/", "");
    let calendar = to_calendar(&single_resource(&xml), "work").unwrap();
    assert_eq!(calendar.uri(), "/dav/calendars/alice/work");
    assert_eq!(calendar.uid(), "work");
}

#[test]
fn missing_href_falls_back_to_requested_uri() {
    let calendar = to_calendar(&single_resource(&calendar_multistatus("", "")), "home/cal/").unwrap();
    assert_eq!(calendar.uri(), "home/cal");
    assert_eq!(calendar.uid(), "cal");
}

#[test]
fn bare_owner_and_bad_values_are_tolerated() {
    let xml = calendar_multistatus(
        "/c/",
        r#"<d:owner>alice</d:owner>
        <d:creationdate>last tuesday</d:creationdate>
        <d:getlastmodified>whenever</d:getlastmodified>
        <d:unknown-property>ignored</d:unknown-property>"#,
    );
    let calendar = to_calendar(&single_resource(&xml), "c").unwrap();
    assert_eq!(calendar.owner.as_deref(), Some("alice"));
    assert!(calendar.creation_date.is_none());
    assert!(calendar.last_modified.is_none());
}

#[test]
fn color_is_accepted_in_caldav_namespace_too() {
    let xml = calendar_multistatus("/c/", "<cal:calendar-color>#123456</cal:calendar-color>");
    let calendar = to_calendar(&single_resource(&xml), "c").unwrap();
    assert_eq!(calendar.color.as_deref(), Some("#123456"));

    let order = QualifiedName::new(APPLE_ICAL_NS, "calendar-order");
    assert_eq!(order, names::CALENDAR_ORDER);
}

#[test]
fn events_are_decoded_from_every_resource() {
    let xml = report_multistatus(&[
        ("/c/a.ics", "\"ea\"", event_ics("a", "First")),
        ("/c/b.ics", "\"eb\"", event_ics("b", "Second")),
    ]);
    let resources = parse_multistatus_bytes(xml.as_bytes()).unwrap().resources;
    let events = to_events(&resources);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].uid, "a");
    assert_eq!(events[0].summary.as_deref(), Some("First"));
    assert_eq!(events[0].etag.as_deref(), Some("\"ea\""));
    assert_eq!(events[1].uid, "b");
    assert_eq!(events[1].etag.as_deref(), Some("\"eb\""));
}

#[test]
fn resources_without_calendar_data_are_ignored() {
    let xml = collection_multistatus("/c/", "<d:collection/>", "<d:getetag>\"x\"</d:getetag>");
    let resources = parse_multistatus_bytes(xml.as_bytes()).unwrap().resources;
    assert!(to_events(&resources).is_empty());
}

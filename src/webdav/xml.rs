//! Request bodies for `PROPFIND` and `REPORT`.

use crate::webdav::names::{
    self, CALDAV_NS, CALENDARSERVER_NS, DAV_NS, QualifiedName,
};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Properties requested by a `PROPFIND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropfindRequest {
    /// `<D:allprop/>`
    AllProp,
    /// An explicit `<D:prop>` list, emitted in the given order.
    Props(Vec<QualifiedName>),
}

/// The property set used when listing calendars under the principal root.
pub fn calendar_discovery_props() -> PropfindRequest {
    PropfindRequest::Props(vec![
        names::RESOURCE_TYPE,
        names::DISPLAY_NAME,
        names::GET_CTAG,
        names::SUPPORTED_CALENDAR_COMPONENT_SET,
    ])
}

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Build a `DAV:propfind` body declaring the `D`, `C` and `CS` prefixes.
///
/// An empty [`PropfindRequest::Props`] list yields an empty `<D:prop/>`.
pub fn build_propfind_body(request: &PropfindRequest) -> String {
    let mut body = String::from(XML_DECL);
    push_root(
        &mut body,
        &names::PROPFIND,
        &[("D", DAV_NS), ("C", CALDAV_NS), ("CS", CALENDARSERVER_NS)],
    );
    match request {
        PropfindRequest::AllProp => push_empty_element(&mut body, &names::ALLPROP),
        PropfindRequest::Props(props) if props.is_empty() => {
            push_empty_element(&mut body, &names::PROP)
        }
        PropfindRequest::Props(props) => push_prop(&mut body, props),
    }
    push_close(&mut body, &names::PROPFIND);
    body
}

/// Build a CalDAV `calendar-query` asking for `getetag` and `calendar-data` of every
/// object matching a single component filter.
pub fn build_calendar_query_body(component: &str) -> String {
    let mut body = String::from(XML_DECL);
    push_root(
        &mut body,
        &names::CALENDAR_QUERY,
        &[("D", DAV_NS), ("C", CALDAV_NS)],
    );
    push_prop(&mut body, &[names::GET_ETAG, names::CALENDAR_DATA]);
    push_open(&mut body, &names::FILTER);
    body.push_str(&format!(
        r#"<{} name="{}"/>"#,
        tag(&names::COMP_FILTER),
        escape_xml(component)
    ));
    push_close(&mut body, &names::FILTER);
    push_close(&mut body, &names::CALENDAR_QUERY);
    body
}

/// `P:local` for names in a declared namespace. Only called with catalog names.
fn tag(name: &QualifiedName) -> String {
    match name.prefix() {
        Some(prefix) => format!("{prefix}:{}", name.local_name()),
        None => name.local_name().to_string(),
    }
}

fn push_root(body: &mut String, name: &QualifiedName, prefixes: &[(&str, &str)]) {
    body.push('<');
    body.push_str(&tag(name));
    for (prefix, namespace) in prefixes {
        body.push_str(&format!(r#" xmlns:{prefix}="{namespace}""#));
    }
    body.push('>');
}

fn push_open(body: &mut String, name: &QualifiedName) {
    body.push_str(&format!("<{}>", tag(name)));
}

fn push_close(body: &mut String, name: &QualifiedName) {
    body.push_str(&format!("</{}>", tag(name)));
}

fn push_prop(body: &mut String, props: &[QualifiedName]) {
    push_open(body, &names::PROP);
    for name in props {
        push_empty_element(body, name);
    }
    push_close(body, &names::PROP);
}

fn push_empty_element(body: &mut String, name: &QualifiedName) {
    match name.prefix() {
        Some(prefix @ ("D" | "C" | "CS")) => {
            body.push_str(&format!("<{prefix}:{}/>", name.local_name()));
        }
        _ => {
            body.push_str(&format!(
                r#"<{} xmlns="{}"/>"#,
                name.local_name(),
                escape_xml(name.namespace())
            ));
        }
    }
}

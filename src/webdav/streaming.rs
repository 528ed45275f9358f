//! Multi-status (`207`) response interpretation.
//!
//! Every `<response>` becomes a [`Resource`] holding its raw href and a
//! [`crate::webdav::PropertyMap`]. Properties reported under a non-2xx `<propstat>` are dropped.
//! Property values with child elements are rendered as namespace-free markup, e.g.
//! `<collection/><calendar/>` for a calendar's `resourcetype`.

use std::io::{BufRead, Cursor};

use anyhow::{Result, anyhow};
use quick_xml::NsReader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::name::ResolveResult;
use tracing::{debug, warn};

use crate::webdav::names::{self, QualifiedName};
use crate::webdav::types::{DavResponse, MultiStatus, Resource};

/// Property currently being collected.
struct OpenProperty {
    name: QualifiedName,
    value: String,
    /// Names of the property's direct child elements.
    children: Vec<QualifiedName>,
}

impl OpenProperty {
    fn push_child(&mut self, name: &QualifiedName, attrs: &BytesStart<'_>, direct: bool) {
        if direct {
            self.children.push(name.clone());
        }
        self.value.push('<');
        self.value.push_str(name.local_name());
        push_attributes(&mut self.value, attrs);
    }
}

pub(crate) struct MultistatusParser {
    stack: Vec<QualifiedName>,
    current: Option<Resource>,
    propstat_props: Vec<OpenProperty>,
    propstat_status: Option<String>,
    /// Stack height right after the enclosing `<D:prop>` was pushed.
    prop_level: Option<usize>,
    property: Option<OpenProperty>,
    out: MultiStatus,
}

impl MultistatusParser {
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(16),
            current: None,
            propstat_props: Vec::new(),
            propstat_status: None,
            prop_level: None,
            property: None,
            out: MultiStatus::default(),
        }
    }

    fn finish(self) -> MultiStatus {
        self.out
    }

    fn parent(&self) -> Option<&QualifiedName> {
        self.stack.last()
    }

    /// True while the top of the stack is the open property element itself.
    fn at_property_level(&self) -> bool {
        self.prop_level
            .is_some_and(|level| self.stack.len() == level + 1)
    }

    fn on_start(&mut self, name: QualifiedName, attrs: &BytesStart<'_>) {
        let direct = self.at_property_level();
        if let Some(property) = self.property.as_mut() {
            property.push_child(&name, attrs, direct);
            property.value.push('>');
            self.stack.push(name);
            return;
        }

        if self.prop_level == Some(self.stack.len()) {
            self.property = Some(OpenProperty {
                name: name.clone(),
                value: String::new(),
                children: Vec::new(),
            });
        } else if name == names::RESPONSE {
            self.current = Some(Resource::default());
        } else if name == names::PROPSTAT && self.parent() == Some(&names::RESPONSE) {
            self.propstat_props.clear();
            self.propstat_status = None;
        } else if name == names::PROP && self.parent() == Some(&names::PROPSTAT) {
            self.prop_level = Some(self.stack.len() + 1);
        }
        self.stack.push(name);
    }

    fn on_empty(&mut self, name: QualifiedName, attrs: &BytesStart<'_>) {
        let direct = self.at_property_level();
        if let Some(property) = self.property.as_mut() {
            property.push_child(&name, attrs, direct);
            property.value.push_str("/>");
            return;
        }
        self.on_start(name, attrs);
        self.on_end();
    }

    fn on_end(&mut self) {
        let Some(popped) = self.stack.pop() else {
            return;
        };
        let height = self.stack.len();

        if let Some(level) = self.prop_level {
            if self.property.is_some() {
                if height == level {
                    if let Some(mut done) = self.property.take() {
                        done.value = done.value.trim().to_string();
                        self.propstat_props.push(done);
                    }
                } else if let Some(property) = self.property.as_mut() {
                    property.value.push_str("</");
                    property.value.push_str(popped.local_name());
                    property.value.push('>');
                }
                return;
            }
            if popped == names::PROP && height + 1 == level {
                self.prop_level = None;
                return;
            }
        }

        if popped == names::PROPSTAT && self.parent() == Some(&names::RESPONSE) {
            self.commit_propstat();
        } else if popped == names::RESPONSE
            && let Some(resource) = self.current.take()
        {
            self.out.resources.push(resource);
        }
    }

    fn commit_propstat(&mut self) {
        let props = std::mem::take(&mut self.propstat_props);
        let status = self.propstat_status.take();
        if !status.as_deref().is_none_or(status_is_success) {
            debug!(
                status = status.as_deref().unwrap_or_default(),
                dropped = props.len(),
                "skipping properties from failed propstat"
            );
            return;
        }
        if let Some(resource) = self.current.as_mut() {
            for prop in props {
                if prop.name == names::RESOURCE_TYPE {
                    resource.resource_types = prop.children;
                }
                resource.properties.insert(prop.name, prop.value);
            }
        }
    }

    fn on_text(&mut self, text: &str) {
        if let Some(property) = self.property.as_mut() {
            let nested = self
                .prop_level
                .is_some_and(|level| self.stack.len() > level + 1);
            if !(nested && text.trim().is_empty()) {
                property.value.push_str(text);
            }
            return;
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        let Some(top) = self.stack.last() else {
            return;
        };
        let parent = self.stack.len().checked_sub(2).map(|i| &self.stack[i]);

        if *top == names::HREF && parent == Some(&names::RESPONSE) {
            if let Some(resource) = self.current.as_mut() {
                resource.uri.push_str(trimmed);
            }
        } else if *top == names::STATUS && parent == Some(&names::PROPSTAT) {
            self.propstat_status = Some(trimmed.to_string());
        } else if *top == names::STATUS && parent == Some(&names::RESPONSE) {
            if let Some(resource) = self.current.as_mut() {
                resource.status = Some(trimmed.to_string());
            }
        } else if *top == names::SYNC_TOKEN && parent == Some(&names::MULTISTATUS) {
            self.out.sync_token = Some(trimmed.to_string());
        }
    }
}

/// Namespace declarations are left out so rendered values stay namespace-free.
fn push_attributes(out: &mut String, start: &BytesStart<'_>) {
    for attr in start.attributes().with_checks(false).flatten() {
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = attr.key.local_name();
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        out.push(' ');
        out.push_str(&String::from_utf8_lossy(key.as_ref()));
        out.push_str("=\"");
        out.push_str(&value);
        out.push('"');
    }
}

/// Parses the numeric code out of an HTTP status line (`HTTP/1.1 200 OK`).
fn status_is_success(line: &str) -> bool {
    line.split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .is_none_or(|code| (200..300).contains(&code))
}

fn qualified(ns: &ResolveResult<'_>, local: &[u8]) -> QualifiedName {
    let namespace = match ns {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).into_owned(),
        _ => String::new(),
    };
    QualifiedName::new(namespace, String::from_utf8_lossy(local).into_owned())
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    let name = String::from_utf8_lossy(reference.as_ref());
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => numeric.parse::<u32>(),
        }
        .map_err(|e| anyhow!("invalid character reference `&{name};`: {e}"))?;
        return char::from_u32(code)
            .map(String::from)
            .ok_or_else(|| anyhow!("invalid character reference `&{name};`"));
    }
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("unknown entity `&{name};`"))
}

fn parse_multistatus_with<R: BufRead>(reader: R) -> Result<MultiStatus> {
    let mut xml = NsReader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(8 * 1024);
    let mut parser = MultistatusParser::new();

    loop {
        match xml.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(e))) => {
                let name = qualified(&ns, e.local_name().as_ref());
                parser.on_start(name, &e);
            }
            Ok((ns, Event::Empty(e))) => {
                let name = qualified(&ns, e.local_name().as_ref());
                parser.on_empty(name, &e);
            }
            Ok((_, Event::End(_))) => parser.on_end(),
            Ok((_, Event::Text(e))) => parser.on_text(&decode_text(e.as_ref())?),
            Ok((_, Event::CData(e))) => parser.on_text(&String::from_utf8_lossy(e.as_ref())),
            Ok((_, Event::GeneralRef(e))) => parser.on_text(&resolve_reference(&e)?),
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(anyhow!("XML parsing error: {e}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.finish())
}

/// Parse an aggregated `207 Multi-Status` body.
pub fn parse_multistatus_bytes(body: &[u8]) -> Result<MultiStatus> {
    parse_multistatus_with(Cursor::new(body))
}

/// Turn a transport response into resources.
///
/// A non-2xx response or an unparsable body yields an empty list; neither is an error
/// at this layer.
pub fn interpret_response(response: &DavResponse) -> Vec<Resource> {
    if !response.is_success() {
        debug!(status = %response.status, "request failed, no resources");
        return Vec::new();
    }
    match parse_multistatus_bytes(&response.body) {
        Ok(multistatus) => multistatus.resources,
        Err(err) => {
            warn!(error = %err, "discarding malformed multistatus body");
            Vec::new()
        }
    }
}

pub fn decode_text(raw: &[u8]) -> Result<String> {
    match std::str::from_utf8(raw) {
        Ok(s) => Ok(unescape(s)
            .map_err(|err| anyhow!("XML decode error: {err}"))?
            .into_owned()),
        Err(_) => Ok(String::from_utf8_lossy(raw).into_owned()),
    }
}

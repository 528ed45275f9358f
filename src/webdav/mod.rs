pub mod names;
pub mod streaming;
pub mod transport;
pub mod types;
pub mod xml;

pub use names::QualifiedName;
pub use streaming::{interpret_response, parse_multistatus_bytes};
pub use transport::{HyperTransport, Transport};
pub use types::{DavRequest, DavResponse, Depth, MultiStatus, PropertyMap, Resource};
pub use xml::{
    PropfindRequest, build_calendar_query_body, build_propfind_body, calendar_discovery_props,
    escape_xml,
};

pub mod compression;
pub mod config;
pub mod error;
pub mod http;

pub use compression::{ContentEncoding, add_accept_encoding, decompress_body, detect_encodings};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{HyperClient, build_hyper_client};

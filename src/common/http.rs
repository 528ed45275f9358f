//! Connection setup for [`crate::webdav::HyperTransport`].

use anyhow::Result;
use bytes::Bytes;
use http_body_util::Full;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tracing::debug;

use crate::common::config::ClientConfig;

/// A client talks to one calendar home, so a handful of idle connections is enough.
const MAX_IDLE_PER_HOST: usize = 4;

pub type HyperClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Build the pooled HTTP client behind every CalDAV request.
///
/// Plain `http` is accepted for local servers. TLS prefers the platform roots and falls
/// back to the bundled WebPKI store. Idle connections are dropped after the configured
/// request timeout.
pub fn build_hyper_client(config: &ClientConfig) -> Result<HyperClient> {
    let https_builder = HttpsConnectorBuilder::new()
        .with_native_roots()
        .unwrap_or_else(|err| {
            debug!(error = %err, "native roots unavailable, using webpki roots");
            HttpsConnectorBuilder::new().with_webpki_roots()
        });

    let https = https_builder
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Ok(Client::builder(TokioExecutor::new())
        .pool_timer(TokioTimer::new())
        .pool_idle_timeout(config.timeout)
        .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
        .build::<_, Full<Bytes>>(https))
}

use std::future::Future;

use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{HeaderMap, Request, Uri, header};
use tokio::time::{Duration, timeout};
use tracing::debug;

use crate::common::compression::{add_accept_encoding, decompress_body, detect_encodings};
use crate::common::config::ClientConfig;
use crate::common::http::{HyperClient, build_hyper_client};
use crate::webdav::types::{DavRequest, DavResponse};

/// Executes WebDAV requests against a server.
///
/// Implementations own authentication, timeouts and connection reuse. The protocol layer
/// only sees a status and an aggregated body.
pub trait Transport: Send + Sync {
    /// Base URL relative targets are resolved against. Always ends in `/`.
    fn base_url(&self) -> &str;

    fn execute(&self, request: DavRequest) -> impl Future<Output = Result<DavResponse>> + Send;
}

/// [`Transport`] built on **hyper 1.x** + **rustls** with Basic authentication.
///
/// Cloning is cheap and reuses the same connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    base_url: String,
    base: Uri,
    client: HyperClient,
    auth_header: Option<header::HeaderValue>,
    user_agent: header::HeaderValue,
    default_timeout: Duration,
}

impl HyperTransport {
    /// Create a transport from a client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not a valid URI, credentials cannot be encoded
    /// into a header, or TLS setup fails.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = build_hyper_client(config)?;

        let base: Uri = config.base_url.parse()?;
        if base.scheme().is_none() || base.authority().is_none() {
            return Err(anyhow!("base url must be absolute: {}", config.base_url));
        }
        let auth_header = if let (Some(u), Some(p)) = (&config.username, &config.password) {
            let token = format!("{}:{}", u, p);
            let val = format!("Basic {}", B64.encode(token));
            let mut value = header::HeaderValue::from_str(&val)?;
            value.set_sensitive(true);
            Some(value)
        } else {
            None
        };

        Ok(Self {
            base_url: config.base_url.clone(),
            base,
            client,
            auth_header,
            user_agent: header::HeaderValue::from_str(&config.user_agent)?,
            default_timeout: config.timeout,
        })
    }

    /// Resolve `path` against the base URL.
    ///
    /// Absolute `http(s)://` URLs are returned as-is, paths starting with `/` replace the
    /// base path, anything else is appended to it.
    pub fn build_uri(&self, path: &str) -> Result<Uri> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.parse()?);
        }

        let mut parts = self.base.clone().into_parts();
        let existing_path = parts
            .path_and_query
            .as_ref()
            .map(|pq| pq.path())
            .unwrap_or("/");

        let (path_only, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let mut combined = if path_only.is_empty() {
            existing_path.to_string()
        } else if path_only.starts_with('/') {
            path_only.to_string()
        } else {
            let mut base = existing_path.trim_end_matches('/').to_string();
            base.push('/');
            base.push_str(path_only);
            base
        };

        if combined.is_empty() {
            combined.push('/');
        }

        let path_and_query = match query {
            Some(q) => format!("{}?{}", combined, q).parse()?,
            None => combined.parse()?,
        };

        parts.path_and_query = Some(path_and_query);
        Ok(Uri::from_parts(parts)?)
    }
}

impl Transport for HyperTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, request: DavRequest) -> Result<DavResponse> {
        let uri = self.build_uri(&request.target)?;
        let method = request.method.clone();
        let mut req_builder = Request::builder().method(request.method).uri(uri);

        let mut headers = HeaderMap::new();
        if let Some(auth) = &self.auth_header {
            headers.insert(header::AUTHORIZATION, auth.clone());
        }
        headers.insert(header::USER_AGENT, self.user_agent.clone());
        if let Some(depth) = request.depth {
            headers.insert("Depth", header::HeaderValue::from_static(depth.as_str()));
        }
        if let Some(content_type) = request.content_type {
            headers.insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static(content_type),
            );
        }
        add_accept_encoding(&mut headers);

        for (k, v) in headers.iter() {
            req_builder = req_builder.header(k, v);
        }

        let req = req_builder.body(Full::new(request.body.unwrap_or_else(Bytes::new)))?;

        let resp = timeout(self.default_timeout, self.client.request(req))
            .await
            .map_err(|_| anyhow!("{method} {} timed out", request.target))??;

        let status = resp.status();
        let encodings = detect_encodings(resp.headers());
        let (_, body) = resp.into_parts();
        let body = decompress_body(body, &encodings).await?;

        debug!(%method, target = %request.target, %status, bytes = body.len(), "dav request");
        Ok(DavResponse { status, body })
    }
}

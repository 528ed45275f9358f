//! Response decompression.
//!
//! Requests advertise `br, zstd, gzip`; multi-status bodies coming back compressed are
//! unwrapped before they reach the XML interpreter.

use anyhow::Result;
use async_compression::tokio::bufread::{BrotliDecoder, GzipDecoder, ZstdDecoder};
use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::BodyStream;
use hyper::body::Incoming;
use hyper::{HeaderMap, header};
use tokio::io::{AsyncBufRead, AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

/// Content encodings understood by [`decompress_body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Br,
    Gzip,
    Zstd,
}

/// Read the `Content-Encoding` chain, outermost first. Empty means identity.
pub fn detect_encodings(headers: &HeaderMap) -> Vec<ContentEncoding> {
    let Some(raw) = headers
        .get(header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
    else {
        return Vec::new();
    };

    raw.split(',')
        .filter_map(|token| match token.trim().to_ascii_lowercase().as_str() {
            "br" => Some(ContentEncoding::Br),
            "gzip" | "x-gzip" => Some(ContentEncoding::Gzip),
            "zstd" | "zst" => Some(ContentEncoding::Zstd),
            _ => None,
        })
        .collect()
}

/// Insert `Accept-Encoding: br, zstd, gzip` unless the caller already set one.
pub fn add_accept_encoding(headers: &mut HeaderMap) {
    if !headers.contains_key(header::ACCEPT_ENCODING) {
        headers.insert(
            header::ACCEPT_ENCODING,
            header::HeaderValue::from_static("br, zstd, gzip"),
        );
    }
}

/// Aggregate a response body, undoing each encoding in reverse order of application.
pub async fn decompress_body(body: Incoming, encodings: &[ContentEncoding]) -> Result<Bytes> {
    let stream = BodyStream::new(body)
        .map_ok(|frame| frame.into_data().unwrap_or_default())
        .map_err(std::io::Error::other);
    let mut reader: Box<dyn AsyncBufRead + Unpin + Send> =
        Box::new(BufReader::new(StreamReader::new(stream)));

    for encoding in encodings.iter().rev() {
        reader = match encoding {
            ContentEncoding::Br => Box::new(BufReader::new(BrotliDecoder::new(reader))),
            ContentEncoding::Gzip => Box::new(BufReader::new(GzipDecoder::new(reader))),
            ContentEncoding::Zstd => Box::new(BufReader::new(ZstdDecoder::new(reader))),
        };
    }

    let mut out = Vec::with_capacity(16 * 1024);
    reader.read_to_end(&mut out).await?;
    Ok(Bytes::from(out))
}

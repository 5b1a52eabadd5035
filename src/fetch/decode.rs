//! Content decoding for fetched payloads
//!
//! Decompression failures never escape this module: the caller always gets
//! bytes back, falling back to the payload exactly as received.

use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use std::io::Read;
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decompression errors, recovered locally
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("gzip decompression failed: {0}")]
    Gzip(std::io::Error),

    #[error("deflate decompression failed: {0}")]
    Deflate(std::io::Error),
}

/// Returns true if the payload starts with the gzip magic number
pub fn has_gzip_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decompresses a gzip payload (multi-member streams included)
pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(DecodeError::Gzip)?;
    Ok(out)
}

/// Inflates a deflate payload, accepting both zlib-wrapped and raw streams
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    if ZlibDecoder::new(bytes).read_to_end(&mut out).is_ok() {
        return Ok(out);
    }

    out.clear();
    DeflateDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(DecodeError::Deflate)?;
    Ok(out)
}

/// Decodes a response body according to its `content-encoding`
///
/// Gzip is also detected from the payload's magic bytes when the header is
/// absent, which covers `.xml.gz` files served as plain downloads. A decoded
/// payload that still starts with the gzip magic (a `.xml.gz` file served with
/// `content-encoding: gzip`) is decompressed once more. On any decompression
/// failure the bytes from the previous step are returned unchanged.
pub fn decode_body(bytes: Vec<u8>, content_encoding: Option<&str>) -> Vec<u8> {
    let encoding = content_encoding
        .map(|e| e.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let result = match encoding.as_str() {
        "gzip" | "x-gzip" => gunzip(&bytes),
        "deflate" => inflate(&bytes),
        _ if has_gzip_magic(&bytes) => gunzip(&bytes),
        _ => return bytes,
    };

    let decoded = match result {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(
                encoding = %encoding,
                len = bytes.len(),
                "{}; keeping raw payload",
                e
            );
            return bytes;
        }
    };

    if !has_gzip_magic(&decoded) {
        return decoded;
    }

    match gunzip(&decoded) {
        Ok(inner) => {
            tracing::debug!(
                encoding = %encoding,
                len = inner.len(),
                "Payload was gzipped twice"
            );
            inner
        }
        Err(e) => {
            tracing::warn!(
                encoding = %encoding,
                len = decoded.len(),
                "{}; keeping singly decoded payload",
                e
            );
            decoded
        }
    }
}

/// Drops a leading UTF-8 byte order mark
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes)
}

/// Converts body bytes into text, dropping a UTF-8 byte order mark
pub fn bytes_to_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(strip_bom(bytes)).into_owned()
}

//! WebSocket opening handshake
//!
//! Validates an incoming HTTP/1.1 upgrade request against the four RFC
//! 6455 requirements, derives the `Sec-WebSocket-Accept` key, and emits
//! the `101 Switching Protocols` response (or a `400 Bad Request` with
//! a diagnostic body). Requests are represented as [`http::Request`]
//! values; responses are written as raw octets to the caller's sink,
//! after which the transport is in frame mode.

use std::io;

use base64::Engine;
use bytes::{BufMut, Bytes, BytesMut};
use http::header::{CONNECTION, SEC_WEBSOCKET_KEY, SEC_WEBSOCKET_VERSION, UPGRADE};
use http::Request;
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};
use crate::{WS_GUID, WS_VERSION};

/// Maximum HTTP header size accepted by [`parse_request`]
const MAX_HEADER_SIZE: usize = 8192;

/// Validate a WebSocket upgrade request
///
/// The four checks run in a fixed order and the first failure wins:
/// `Upgrade: websocket` (case-insensitive), `Connection` containing the
/// `Upgrade` token (case-insensitive, comma-list), a non-empty
/// `Sec-WebSocket-Key`, and `Sec-WebSocket-Version: 13`.
pub fn validate_request<T>(req: &Request<T>) -> Result<()> {
    let upgrade = header_str(req, UPGRADE.as_str());
    if !upgrade.eq_ignore_ascii_case("websocket") {
        return Err(Error::HandshakeFailed(
            "missing or invalid Upgrade header, expected 'websocket'",
        ));
    }

    let connection = header_str(req, CONNECTION.as_str());
    if !contains_token(connection, "Upgrade") {
        return Err(Error::HandshakeFailed(
            "missing or invalid Connection header, expected 'Upgrade'",
        ));
    }

    if header_str(req, SEC_WEBSOCKET_KEY.as_str()).is_empty() {
        return Err(Error::HandshakeFailed("missing Sec-WebSocket-Key header"));
    }

    if header_str(req, SEC_WEBSOCKET_VERSION.as_str()) != WS_VERSION {
        return Err(Error::HandshakeFailed(
            "unsupported WebSocket version, expected '13'",
        ));
    }

    Ok(())
}

/// Derive the `Sec-WebSocket-Accept` value from the client's key
///
/// Computes `Base64(SHA-1(key || GUID))`. The result is always 28
/// characters (20 digest bytes, base64 with padding).
pub fn accept_key(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(WS_GUID.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

/// Build the raw `101 Switching Protocols` response octets
///
/// No body. When `protocol` is given it is echoed back as
/// `Sec-WebSocket-Protocol`; the core does no subprotocol selection.
pub fn build_response(accept_key: &str, protocol: Option<&str>) -> Bytes {
    let mut buf = BytesMut::with_capacity(256);

    buf.put_slice(b"HTTP/1.1 101 Switching Protocols\r\n");
    buf.put_slice(b"Upgrade: websocket\r\n");
    buf.put_slice(b"Connection: Upgrade\r\n");
    buf.put_slice(b"Sec-WebSocket-Accept: ");
    buf.put_slice(accept_key.as_bytes());
    buf.put_slice(b"\r\n");

    if let Some(proto) = protocol {
        buf.put_slice(b"Sec-WebSocket-Protocol: ");
        buf.put_slice(proto.as_bytes());
        buf.put_slice(b"\r\n");
    }

    buf.put_slice(b"\r\n");
    buf.freeze()
}

/// Build the raw `400 Bad Request` response octets with a plain-text body
pub fn build_rejection(reason: &str) -> Bytes {
    let body = format!("Bad Request: {}\n", reason);
    let mut buf = BytesMut::with_capacity(128 + body.len());

    buf.put_slice(b"HTTP/1.1 400 Bad Request\r\n");
    buf.put_slice(b"Content-Type: text/plain; charset=utf-8\r\n");
    buf.put_slice(b"Content-Length: ");
    buf.put_slice(body.len().to_string().as_bytes());
    buf.put_slice(b"\r\nConnection: close\r\n\r\n");
    buf.put_slice(body.as_bytes());
    buf.freeze()
}

/// Perform the server side of the opening handshake
///
/// On success writes the 101 response to `sink` and returns the derived
/// accept key; the transport is then in raw-frame mode. On validation
/// failure writes a 400 with the failing check's diagnostic and returns
/// the same error to the caller.
pub fn perform_upgrade<T, W: io::Write>(req: &Request<T>, sink: &mut W) -> Result<String> {
    if let Err(err) = validate_request(req) {
        sink.write_all(&build_rejection(&err.to_string()))?;
        return Err(err);
    }

    // Present and non-empty: validate_request checked it.
    let key = header_str(req, SEC_WEBSOCKET_KEY.as_str());
    let accept = accept_key(key);

    sink.write_all(&build_response(&accept, None))?;
    Ok(accept)
}

/// Parse a WebSocket upgrade request from raw octets
///
/// Returns the typed request and the number of octets consumed, or
/// `Ok(None)` when the input is not yet a complete request head. This
/// only parses; conformance checking stays in [`validate_request`].
pub fn parse_request(buf: &[u8]) -> Result<Option<(Request<()>, usize)>> {
    if buf.len() > MAX_HEADER_SIZE {
        return Err(Error::InvalidHttp("request too large"));
    }

    let mut headers = [httparse::EMPTY_HEADER; 32];
    let mut parsed = httparse::Request::new(&mut headers);

    match parsed.parse(buf) {
        Ok(httparse::Status::Complete(len)) => {
            if parsed.method != Some("GET") {
                return Err(Error::InvalidHttp("method must be GET"));
            }

            let mut builder = Request::builder()
                .method("GET")
                .uri(parsed.path.unwrap_or("/"));
            for header in parsed.headers.iter() {
                builder = builder.header(header.name, header.value);
            }
            let req = builder
                .body(())
                .map_err(|_| Error::InvalidHttp("malformed request head"))?;

            Ok(Some((req, len)))
        }
        Ok(httparse::Status::Partial) => Ok(None),
        Err(_) => Err(Error::InvalidHttp("failed to parse HTTP request")),
    }
}

/// Look up a header as a str, treating absent or non-UTF-8 values as empty
fn header_str<'a, T>(req: &'a Request<T>, name: &str) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// Check if a comma-separated header value contains a token, ignoring
/// ASCII case and per-token whitespace
fn contains_token(value: &str, token: &str) -> bool {
    value
        .split(',')
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(token))
}

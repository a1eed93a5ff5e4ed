//! Error types for the WebSocket core

use std::fmt;
use std::io;

use crate::connection::ConnectionState;

/// Result type alias for WebSocket operations
pub type Result<T> = std::result::Result<T, Error>;

/// WebSocket error types
///
/// Every violation the core detects is surfaced to the caller with a
/// distinguishable kind; nothing is recovered locally. Transport I/O
/// errors pass through unchanged as [`Error::Io`].
#[derive(Debug)]
pub enum Error {
    /// I/O error from the underlying byte source or sink
    Io(io::Error),
    /// Structural frame rule violated (control-frame shape, payload/length mismatch)
    InvalidFrameStructure(&'static str),
    /// Unrecognized opcode bits
    InvalidOpcode(u8),
    /// RSV1/2/3 set without a negotiated extension
    ReservedBitsSet,
    /// Declared payload exceeds the configured maximum
    PayloadTooLarge { len: u64, limit: u64 },
    /// Client-originated frame arrived unmasked
    UnmaskedClientFrame,
    /// Server-originated frame arrived masked
    MaskedServerFrame,
    /// Connection is closed
    ConnectionClosed,
    /// Disallowed connection state transition
    InvalidState {
        from: ConnectionState,
        to: ConnectionState,
    },
    /// No connection with the given identifier in the caller's registry
    ConnectionNotFound(String),
    /// Message kind is neither text nor binary
    InvalidMessageType,
    /// Payload required but empty
    EmptyPayload,
    /// Handshake validation failed
    HandshakeFailed(&'static str),
    /// Malformed HTTP request
    InvalidHttp(&'static str),
    /// Protocol violation (close code 1002 territory)
    Protocol(&'static str),
    /// Policy violation (close code 1008 territory)
    Policy(&'static str),
    /// Internal error (close code 1011 territory)
    Internal(String),
}

impl Error {
    /// Map this error to the close-frame status code a server would send
    /// before tearing the connection down.
    ///
    /// Returns `None` for kinds that do not correspond to a close frame
    /// (I/O failures, handshake rejections, registry misses).
    pub fn close_code(&self) -> Option<u16> {
        match self {
            Error::InvalidFrameStructure(_)
            | Error::InvalidOpcode(_)
            | Error::ReservedBitsSet
            | Error::UnmaskedClientFrame
            | Error::MaskedServerFrame
            | Error::Protocol(_) => Some(CloseReason::PROTOCOL_ERROR),
            Error::PayloadTooLarge { .. } => Some(CloseReason::TOO_BIG),
            Error::Policy(_) => Some(CloseReason::POLICY),
            Error::Internal(_) => Some(CloseReason::INTERNAL),
            _ => None,
        }
    }
}

/// Close frame reason: a status code plus an optional UTF-8 reason string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReason {
    /// Close status code
    pub code: u16,
    /// Optional reason string
    pub reason: String,
}

impl CloseReason {
    /// Normal closure
    pub const NORMAL: u16 = 1000;
    /// Going away (e.g., server shutdown)
    pub const GOING_AWAY: u16 = 1001;
    /// Protocol error
    pub const PROTOCOL_ERROR: u16 = 1002;
    /// Unsupported data
    pub const UNSUPPORTED: u16 = 1003;
    /// No status received
    pub const NO_STATUS: u16 = 1005;
    /// Abnormal closure
    pub const ABNORMAL: u16 = 1006;
    /// Invalid frame payload
    pub const INVALID_PAYLOAD: u16 = 1007;
    /// Policy violation
    pub const POLICY: u16 = 1008;
    /// Message too big
    pub const TOO_BIG: u16 = 1009;
    /// Mandatory extension
    pub const EXTENSION: u16 = 1010;
    /// Internal server error
    pub const INTERNAL: u16 = 1011;
    /// Service restart
    pub const SERVICE_RESTART: u16 = 1012;
    /// Try again later
    pub const TRY_AGAIN_LATER: u16 = 1013;
    /// Bad gateway
    pub const BAD_GATEWAY: u16 = 1014;
    /// TLS handshake failure (never sent on the wire)
    pub const TLS_HANDSHAKE: u16 = 1015;

    /// Create a new close reason
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Check if the close code may be sent in a close frame per RFC 6455
    pub fn is_valid_code(code: u16) -> bool {
        matches!(code, 1000..=1003 | 1007..=1014 | 3000..=4999)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidFrameStructure(msg) => write!(f, "invalid frame structure: {}", msg),
            Error::InvalidOpcode(byte) => write!(f, "invalid opcode: 0x{:X}", byte),
            Error::ReservedBitsSet => write!(f, "reserved bits set without negotiated extension"),
            Error::PayloadTooLarge { len, limit } => {
                write!(f, "payload of {} bytes exceeds maximum of {}", len, limit)
            }
            Error::UnmaskedClientFrame => write!(f, "client frame must be masked"),
            Error::MaskedServerFrame => write!(f, "server frame must not be masked"),
            Error::ConnectionClosed => write!(f, "connection is closed"),
            Error::InvalidState { from, to } => {
                write!(f, "invalid state: cannot transition from {} to {}", from, to)
            }
            Error::ConnectionNotFound(id) => write!(f, "connection not found: {}", id),
            Error::InvalidMessageType => write!(f, "invalid message type"),
            Error::EmptyPayload => write!(f, "empty payload"),
            Error::HandshakeFailed(msg) => write!(f, "handshake failed: {}", msg),
            Error::InvalidHttp(msg) => write!(f, "invalid HTTP: {}", msg),
            Error::Protocol(msg) => write!(f, "protocol violation: {}", msg),
            Error::Policy(msg) => write!(f, "policy violation: {}", msg),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

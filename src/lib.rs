//! # wscore: WebSocket protocol core
//!
//! The server-side core of an RFC 6455 (version 13) WebSocket
//! implementation: the wire-level frame codec, the opening-handshake
//! validator, the per-connection lifecycle state machine, and the
//! message abstraction that bridges them.
//!
//! The core is synchronous and per-connection. It owns no sockets, no
//! timers, and no registry of connections; the caller supplies a byte
//! source and sink and drives the loop. All blocking happens inside
//! [`FrameCodec::read_frame`] and [`FrameCodec::write_frame`] on those
//! caller-owned streams.
//!
//! ## Example
//!
//! ```
//! use wscore::{Frame, FrameCodec};
//!
//! let codec = FrameCodec::new(0); // 0 selects the 1 MiB default limit
//!
//! let mut wire = Vec::new();
//! codec.write_frame(&mut wire, &Frame::text("Hello")).unwrap();
//! assert_eq!(wire, [0x81, 0x05, b'H', b'e', b'l', b'l', b'o']);
//!
//! let frame = codec.read_frame(&mut std::io::Cursor::new(&wire)).unwrap();
//! assert_eq!(frame.payload.as_ref(), b"Hello");
//! ```

pub mod codec;
pub mod connection;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod mask;
pub mod message;

pub use codec::{FrameCodec, Role};
pub use connection::{Connection, ConnectionState};
pub use error::{CloseReason, Error, Result};
pub use frame::{Frame, FrameHeader, OpCode};
pub use message::{Message, MessageKind};

/// WebSocket GUID for handshake accept-key derivation (RFC 6455 §1.3)
pub const WS_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// The only WebSocket protocol version this core speaks
pub const WS_VERSION: &str = "13";

/// Maximum WebSocket frame header size (2 + 8 + 4 = 14 bytes)
pub const MAX_FRAME_HEADER_SIZE: usize = 14;

/// Maximum payload of a control frame (Close, Ping, Pong)
pub const MAX_CONTROL_PAYLOAD_SIZE: u8 = 125;

/// 7-bit length-field sentinel selecting the 16-bit extended length
pub const PAYLOAD_LEN_16BIT: u8 = 126;

/// 7-bit length-field sentinel selecting the 64-bit extended length
pub const PAYLOAD_LEN_64BIT: u8 = 127;

/// Default maximum payload size (1 MiB), selected when the codec is
/// constructed with 0
pub const DEFAULT_MAX_PAYLOAD_SIZE: u64 = 1 << 20;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::codec::{FrameCodec, Role};
    pub use crate::connection::{Connection, ConnectionState};
    pub use crate::error::{CloseReason, Error, Result};
    pub use crate::frame::{Frame, FrameHeader, OpCode};
    pub use crate::message::{Message, MessageKind};
}

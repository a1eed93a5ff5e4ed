//! WebSocket frame model
//!
//! This module defines the RFC 6455 frame value: opcode, header, and
//! payload, plus the structural self-checks a frame must pass before it
//! may be written to the wire.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CloseReason, Error, Result};
use crate::{MAX_CONTROL_PAYLOAD_SIZE, PAYLOAD_LEN_16BIT, PAYLOAD_LEN_64BIT};

/// WebSocket opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Continuation frame
    Continuation = 0x0,
    /// Text frame
    Text = 0x1,
    /// Binary frame
    Binary = 0x2,
    /// Connection close
    Close = 0x8,
    /// Ping
    Ping = 0x9,
    /// Pong
    Pong = 0xA,
}

impl OpCode {
    /// Parse opcode from byte
    #[inline]
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x0 => Some(OpCode::Continuation),
            0x1 => Some(OpCode::Text),
            0x2 => Some(OpCode::Binary),
            0x8 => Some(OpCode::Close),
            0x9 => Some(OpCode::Ping),
            0xA => Some(OpCode::Pong),
            _ => None,
        }
    }

    /// Check if this is a control frame
    #[inline]
    pub fn is_control(&self) -> bool {
        (*self as u8) >= 0x8
    }

    /// Check if this is a data frame
    #[inline]
    pub fn is_data(&self) -> bool {
        (*self as u8) <= 0x2
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OpCode::Continuation => "Continuation",
            OpCode::Text => "Text",
            OpCode::Binary => "Binary",
            OpCode::Close => "Close",
            OpCode::Ping => "Ping",
            OpCode::Pong => "Pong",
        };
        f.write_str(name)
    }
}

/// A WebSocket frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Final fragment flag
    pub fin: bool,
    /// RSV1 (reserved, extension use only)
    pub rsv1: bool,
    /// RSV2 (reserved)
    pub rsv2: bool,
    /// RSV3 (reserved)
    pub rsv3: bool,
    /// Frame opcode
    pub opcode: OpCode,
    /// Mask flag
    pub masked: bool,
    /// Declared payload length
    pub payload_len: u64,
    /// Masking key, present only when `masked` is set
    pub mask: Option<[u8; 4]>,
}

impl FrameHeader {
    /// Get the total header size in bytes (2 base + extended length + mask)
    #[inline]
    pub fn header_size(&self) -> usize {
        let mut size = 2;

        if self.payload_len > u16::MAX as u64 {
            size += 8;
        } else if self.payload_len > MAX_CONTROL_PAYLOAD_SIZE as u64 {
            size += 2;
        }

        if self.masked {
            size += 4;
        }

        size
    }

    /// Encode the frame header into a buffer
    ///
    /// Always chooses the narrowest legal length encoding.
    pub fn encode(&self, buf: &mut BytesMut) {
        let mut b0 = self.opcode as u8;
        if self.fin {
            b0 |= 0x80;
        }
        if self.rsv1 {
            b0 |= 0x40;
        }
        if self.rsv2 {
            b0 |= 0x20;
        }
        if self.rsv3 {
            b0 |= 0x10;
        }
        buf.put_u8(b0);

        let mask_bit = if self.masked { 0x80 } else { 0x00 };

        if self.payload_len <= MAX_CONTROL_PAYLOAD_SIZE as u64 {
            buf.put_u8(mask_bit | self.payload_len as u8);
        } else if self.payload_len <= u16::MAX as u64 {
            buf.put_u8(mask_bit | PAYLOAD_LEN_16BIT);
            buf.put_u16(self.payload_len as u16);
        } else {
            buf.put_u8(mask_bit | PAYLOAD_LEN_64BIT);
            buf.put_u64(self.payload_len);
        }

        if self.masked {
            if let Some(mask) = self.mask {
                buf.put_slice(&mask);
            }
        }
    }
}

/// A complete WebSocket frame
///
/// Constructed either by decoding octets ([`crate::FrameCodec::read_frame`])
/// or by the caller supplying an opcode and payload. The payload is stored
/// unmasked in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame header
    pub header: FrameHeader,
    /// Frame payload (already unmasked)
    pub payload: Bytes,
}

impl Frame {
    /// Create a new server-originated frame
    ///
    /// Server frames are never masked; callers that need a masked
    /// (client-originated) frame set `header.masked` and `header.mask`
    /// afterwards.
    pub fn new(opcode: OpCode, payload: Bytes, fin: bool) -> Self {
        Self {
            header: FrameHeader {
                fin,
                rsv1: false,
                rsv2: false,
                rsv3: false,
                opcode,
                masked: false,
                payload_len: payload.len() as u64,
                mask: None,
            },
            payload,
        }
    }

    /// Create a final text frame
    #[inline]
    pub fn text(data: impl Into<Bytes>) -> Self {
        Self::new(OpCode::Text, data.into(), true)
    }

    /// Create a final binary frame
    #[inline]
    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self::new(OpCode::Binary, data.into(), true)
    }

    /// Create a ping frame
    #[inline]
    pub fn ping(data: impl Into<Bytes>) -> Self {
        Self::new(OpCode::Ping, data.into(), true)
    }

    /// Create a pong frame
    #[inline]
    pub fn pong(data: impl Into<Bytes>) -> Self {
        Self::new(OpCode::Pong, data.into(), true)
    }

    /// Create a close frame with a status code and reason
    pub fn close(code: u16, reason: &str) -> Self {
        let mut payload = BytesMut::with_capacity(2 + reason.len());
        payload.put_u16(code);
        payload.put_slice(reason.as_bytes());
        Self::new(OpCode::Close, payload.freeze(), true)
    }

    /// Create an empty close frame
    #[inline]
    pub fn close_empty() -> Self {
        Self::new(OpCode::Close, Bytes::new(), true)
    }

    /// Check if this is a control frame
    #[inline]
    pub fn is_control(&self) -> bool {
        self.header.opcode.is_control()
    }

    /// Check if this is a data frame
    #[inline]
    pub fn is_data(&self) -> bool {
        self.header.opcode.is_data()
    }

    /// Check if this is the final fragment
    #[inline]
    pub fn is_final(&self) -> bool {
        self.header.fin
    }

    /// Validate the frame structure per RFC 6455
    ///
    /// Checked before any octet is written on the encode path. The
    /// opcode itself is always recognized here (an unknown opcode cannot
    /// be represented); decode-side opcode rejection happens in the
    /// codec before a `Frame` is assembled.
    pub fn validate(&self) -> Result<()> {
        if self.header.rsv1 || self.header.rsv2 || self.header.rsv3 {
            return Err(Error::ReservedBitsSet);
        }

        if self.is_control() {
            if self.header.payload_len > MAX_CONTROL_PAYLOAD_SIZE as u64 {
                return Err(Error::InvalidFrameStructure(
                    "control frame payload exceeds 125 bytes",
                ));
            }
            if !self.header.fin {
                return Err(Error::InvalidFrameStructure(
                    "control frame must not be fragmented",
                ));
            }
        }

        if self.payload.len() as u64 != self.header.payload_len {
            return Err(Error::InvalidFrameStructure(
                "payload length does not match declared length",
            ));
        }

        if self.header.masked && self.header.mask.is_none() {
            return Err(Error::InvalidFrameStructure(
                "masked frame missing masking key",
            ));
        }

        Ok(())
    }

    /// Parse a close frame payload into code and reason
    ///
    /// Returns `None` when the payload carries no status code.
    pub fn parse_close(&self) -> Option<CloseReason> {
        if self.payload.len() < 2 {
            return None;
        }
        let code = u16::from_be_bytes([self.payload[0], self.payload[1]]);
        let reason = if self.payload.len() > 2 {
            String::from_utf8_lossy(&self.payload[2..]).into_owned()
        } else {
            String::new()
        };
        Some(CloseReason::new(code, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_classification() {
        assert!(OpCode::Close.is_control());
        assert!(OpCode::Ping.is_control());
        assert!(OpCode::Pong.is_control());
        assert!(!OpCode::Text.is_control());
        assert!(OpCode::Continuation.is_data());
        assert!(OpCode::Text.is_data());
        assert!(OpCode::Binary.is_data());
        assert!(!OpCode::Pong.is_data());
    }

    #[test]
    fn test_opcode_from_u8() {
        assert_eq!(OpCode::from_u8(0x1), Some(OpCode::Text));
        assert_eq!(OpCode::from_u8(0xA), Some(OpCode::Pong));
        assert_eq!(OpCode::from_u8(0x3), None);
        assert_eq!(OpCode::from_u8(0x7), None);
        assert_eq!(OpCode::from_u8(0xF), None);
    }

    #[test]
    fn test_server_constructor_unmasked() {
        let frame = Frame::text("Hello");
        assert!(!frame.header.masked);
        assert!(frame.header.mask.is_none());
        assert!(frame.header.fin);
        assert_eq!(frame.header.payload_len, 5);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_reserved_bits() {
        let mut frame = Frame::binary(vec![1, 2, 3]);
        frame.header.rsv1 = true;
        assert!(matches!(frame.validate(), Err(Error::ReservedBitsSet)));
    }

    #[test]
    fn test_validate_rejects_oversized_control() {
        let frame = Frame::ping(vec![0u8; 126]);
        assert!(matches!(
            frame.validate(),
            Err(Error::InvalidFrameStructure(_))
        ));
    }

    #[test]
    fn test_validate_rejects_fragmented_control() {
        let mut frame = Frame::close_empty();
        frame.header.fin = false;
        assert!(matches!(
            frame.validate(),
            Err(Error::InvalidFrameStructure(_))
        ));
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut frame = Frame::binary(vec![1, 2, 3]);
        frame.header.payload_len = 4;
        assert!(matches!(
            frame.validate(),
            Err(Error::InvalidFrameStructure(_))
        ));
    }

    #[test]
    fn test_reserved_bits_reported_before_control_shape() {
        // A frame violating both rules reports the reserved bits first.
        let mut frame = Frame::ping(vec![0u8; 126]);
        frame.header.rsv2 = true;
        assert!(matches!(frame.validate(), Err(Error::ReservedBitsSet)));
    }

    #[test]
    fn test_header_size() {
        assert_eq!(Frame::text("hi").header.header_size(), 2);
        assert_eq!(Frame::binary(vec![0u8; 200]).header.header_size(), 4);
        assert_eq!(Frame::binary(vec![0u8; 70000]).header.header_size(), 10);

        let mut frame = Frame::text("hi");
        frame.header.masked = true;
        frame.header.mask = Some([1, 2, 3, 4]);
        assert_eq!(frame.header.header_size(), 6);
    }

    #[test]
    fn test_close_frame_round_trip() {
        let frame = Frame::close(CloseReason::NORMAL, "goodbye");
        assert_eq!(frame.header.opcode, OpCode::Close);
        let reason = frame.parse_close().unwrap();
        assert_eq!(reason.code, 1000);
        assert_eq!(reason.reason, "goodbye");
    }

    #[test]
    fn test_parse_close_without_code() {
        assert!(Frame::close_empty().parse_close().is_none());
    }
}

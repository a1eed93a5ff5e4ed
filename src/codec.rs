//! WebSocket frame codec
//!
//! Bidirectional translation between a stream of octets and [`Frame`]
//! values, with all RFC 6455 structural checks applied at the octet
//! level. The codec is synchronous: all blocking happens on the
//! caller-supplied [`io::Read`] source and [`io::Write`] sink, and
//! every read is for an exact octet count. It never retries; a short
//! read surfaces as [`Error::Io`] and leaves the stream position
//! undefined.

use std::io;

use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::frame::{Frame, FrameHeader, OpCode};
use crate::mask::apply_mask;
use crate::{DEFAULT_MAX_PAYLOAD_SIZE, MAX_CONTROL_PAYLOAD_SIZE, PAYLOAD_LEN_16BIT, PAYLOAD_LEN_64BIT};

/// Frame codec with a configurable maximum payload size
///
/// The only configuration knob is `max_payload_size`; passing 0 selects
/// [`DEFAULT_MAX_PAYLOAD_SIZE`] (1 MiB).
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_payload_size: u64,
}

impl FrameCodec {
    /// Create a new codec
    pub fn new(max_payload_size: u64) -> Self {
        let max_payload_size = if max_payload_size == 0 {
            DEFAULT_MAX_PAYLOAD_SIZE
        } else {
            max_payload_size
        };
        Self { max_payload_size }
    }

    /// The effective maximum payload size
    pub fn max_payload_size(&self) -> u64 {
        self.max_payload_size
    }

    /// Read and decode one frame
    ///
    /// Validation order is fixed: opcode, then reserved bits, then the
    /// size limit, then control-frame shape. A frame violating several
    /// rules is reported against the first one. The size limit is
    /// checked before any payload octet is consumed.
    pub fn read_frame<R: io::Read>(&self, reader: &mut R) -> Result<Frame> {
        let mut header = [0u8; 2];
        reader.read_exact(&mut header)?;

        let fin = header[0] & 0x80 != 0;
        let rsv1 = header[0] & 0x40 != 0;
        let rsv2 = header[0] & 0x20 != 0;
        let rsv3 = header[0] & 0x10 != 0;
        let opcode_bits = header[0] & 0x0F;

        let opcode = OpCode::from_u8(opcode_bits).ok_or(Error::InvalidOpcode(opcode_bits))?;

        if rsv1 || rsv2 || rsv3 {
            return Err(Error::ReservedBitsSet);
        }

        let masked = header[1] & 0x80 != 0;
        let payload_len = self.read_payload_len(reader, header[1] & 0x7F)?;

        if payload_len > self.max_payload_size {
            return Err(Error::PayloadTooLarge {
                len: payload_len,
                limit: self.max_payload_size,
            });
        }

        if opcode.is_control() {
            if payload_len > MAX_CONTROL_PAYLOAD_SIZE as u64 {
                return Err(Error::InvalidFrameStructure(
                    "control frame payload exceeds 125 bytes",
                ));
            }
            if !fin {
                return Err(Error::InvalidFrameStructure(
                    "control frame must not be fragmented",
                ));
            }
        }

        let mask = if masked {
            let mut key = [0u8; 4];
            reader.read_exact(&mut key)?;
            Some(key)
        } else {
            None
        };

        let payload = if payload_len > 0 {
            let mut buf = vec![0u8; payload_len as usize];
            reader.read_exact(&mut buf)?;
            if let Some(key) = mask {
                apply_mask(&mut buf, key);
            }
            Bytes::from(buf)
        } else {
            Bytes::new()
        };

        Ok(Frame {
            header: FrameHeader {
                fin,
                rsv1,
                rsv2,
                rsv3,
                opcode,
                masked,
                payload_len,
                mask,
            },
            payload,
        })
    }

    /// Read the extended payload length when the 7-bit field is a sentinel
    ///
    /// All three encodings are accepted regardless of the value they
    /// carry; minimal-width encoding is required only on write.
    fn read_payload_len<R: io::Read>(&self, reader: &mut R, len7: u8) -> Result<u64> {
        match len7 {
            PAYLOAD_LEN_16BIT => {
                let mut buf = [0u8; 2];
                reader.read_exact(&mut buf)?;
                Ok(u16::from_be_bytes(buf) as u64)
            }
            PAYLOAD_LEN_64BIT => {
                let mut buf = [0u8; 8];
                reader.read_exact(&mut buf)?;
                Ok(u64::from_be_bytes(buf))
            }
            len => Ok(len as u64),
        }
    }

    /// Validate and encode one frame
    ///
    /// Nothing is written when validation fails. The header and payload
    /// are emitted as a single logical write; for masked frames the
    /// payload is masked into a copy, never in place.
    pub fn write_frame<W: io::Write>(&self, writer: &mut W, frame: &Frame) -> Result<()> {
        frame.validate()?;

        let mut buf = BytesMut::with_capacity(frame.header.header_size() + frame.payload.len());
        frame.header.encode(&mut buf);

        if let Some(key) = frame.header.mask.filter(|_| frame.header.masked) {
            let mut masked = frame.payload.to_vec();
            apply_mask(&mut masked, key);
            buf.extend_from_slice(&masked);
        } else {
            buf.extend_from_slice(&frame.payload);
        }

        writer.write_all(&buf)?;
        Ok(())
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(0)
    }
}

/// WebSocket endpoint role
///
/// The codec itself never asserts masking direction so that the same
/// codec serves both sides. Callers that want RFC 6455 direction
/// enforcement run each inbound frame through
/// [`Role::validate_inbound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Client endpoint: sends masked, receives unmasked
    Client,
    /// Server endpoint: sends unmasked, receives masked
    Server,
}

impl Role {
    /// Enforce the masking direction on an inbound frame
    pub fn validate_inbound(&self, frame: &Frame) -> Result<()> {
        match self {
            Role::Server if !frame.header.masked => Err(Error::UnmaskedClientFrame),
            Role::Client if frame.header.masked => Err(Error::MaskedServerFrame),
            _ => Ok(()),
        }
    }
}

//! Application-level message abstraction
//!
//! A [`Message`] is what callers hand to the core before it becomes a
//! data frame, and what they assemble received data frames back into.
//! Only the Text and Binary kinds exist at this level; control frames
//! stay at the frame layer.

use std::fmt;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::frame::{Frame, OpCode};

/// Message kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Text message
    Text,
    /// Binary message
    Binary,
}

impl MessageKind {
    /// Map a frame opcode to a message kind
    ///
    /// Only the Text and Binary data opcodes map; every other opcode is
    /// rejected with [`Error::InvalidMessageType`].
    pub fn from_opcode(opcode: OpCode) -> Result<Self> {
        match opcode {
            OpCode::Text => Ok(MessageKind::Text),
            OpCode::Binary => Ok(MessageKind::Binary),
            _ => Err(Error::InvalidMessageType),
        }
    }

    /// Map this kind to its frame opcode
    pub fn to_opcode(&self) -> OpCode {
        match self {
            MessageKind::Text => OpCode::Text,
            MessageKind::Binary => OpCode::Binary,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Text => f.write_str("Text"),
            MessageKind::Binary => f.write_str("Binary"),
        }
    }
}

/// A WebSocket message
///
/// Empty payloads are legal for both kinds. Text payloads are carried
/// as raw octets; UTF-8 validation is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message kind
    pub kind: MessageKind,
    /// Message payload
    pub payload: Bytes,
}

impl Message {
    /// Create a text message
    pub fn text(payload: impl Into<Bytes>) -> Self {
        Self {
            kind: MessageKind::Text,
            payload: payload.into(),
        }
    }

    /// Create a binary message
    pub fn binary(payload: impl Into<Bytes>) -> Self {
        Self {
            kind: MessageKind::Binary,
            payload: payload.into(),
        }
    }

    /// Check if this is a text message
    pub fn is_text(&self) -> bool {
        self.kind == MessageKind::Text
    }

    /// Check if this is a binary message
    pub fn is_binary(&self) -> bool {
        self.kind == MessageKind::Binary
    }

    /// The frame opcode for this message's kind
    pub fn to_opcode(&self) -> OpCode {
        self.kind.to_opcode()
    }

    /// Build a message from a data frame
    ///
    /// Continuation and control frames are rejected with
    /// [`Error::InvalidMessageType`]; fragment reassembly happens above
    /// this core.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let kind = MessageKind::from_opcode(frame.header.opcode)?;
        Ok(Self {
            kind,
            payload: frame.payload.clone(),
        })
    }

    /// Convert into a final, unmasked data frame (server construction path)
    pub fn into_frame(self) -> Frame {
        Frame::new(self.kind.to_opcode(), self.payload, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let text = Message::text("hello");
        assert!(text.is_text());
        assert!(!text.is_binary());
        assert_eq!(text.payload.as_ref(), b"hello");

        let binary = Message::binary(vec![1, 2, 3]);
        assert!(binary.is_binary());
        assert_eq!(binary.payload.as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_empty_payloads_are_legal() {
        assert!(Message::text("").payload.is_empty());
        assert!(Message::binary(Bytes::new()).payload.is_empty());
    }

    #[test]
    fn test_opcode_mapping() {
        assert_eq!(Message::text("x").to_opcode(), OpCode::Text);
        assert_eq!(Message::binary(vec![0]).to_opcode(), OpCode::Binary);
        assert_eq!(
            MessageKind::from_opcode(OpCode::Text).unwrap(),
            MessageKind::Text
        );
        assert_eq!(
            MessageKind::from_opcode(OpCode::Binary).unwrap(),
            MessageKind::Binary
        );
    }

    #[test]
    fn test_non_data_opcodes_rejected() {
        for opcode in [OpCode::Continuation, OpCode::Close, OpCode::Ping, OpCode::Pong] {
            assert!(matches!(
                MessageKind::from_opcode(opcode),
                Err(Error::InvalidMessageType)
            ));
        }
    }

    #[test]
    fn test_frame_conversions() {
        let frame = Message::text("ping me").into_frame();
        assert_eq!(frame.header.opcode, OpCode::Text);
        assert!(frame.header.fin);
        assert!(!frame.header.masked);

        let back = Message::from_frame(&frame).unwrap();
        assert_eq!(back, Message::text("ping me"));

        assert!(matches!(
            Message::from_frame(&Frame::ping(vec![])),
            Err(Error::InvalidMessageType)
        ));
    }
}

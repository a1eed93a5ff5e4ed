//! Per-connection lifecycle state machine
//!
//! A connection moves through Connecting → Open → Closing → Closed;
//! the permitted transitions form a DAG and Closed is terminal. The
//! caller owns the socket and the registry; this type only carries the
//! per-connection state, an activity stamp, and a metadata bag.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use crate::error::{Error, Result};

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Handshake in progress
    Connecting,
    /// Handshake complete, frames flowing
    Open,
    /// Close frame sent or received
    Closing,
    /// Transport torn down; terminal
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Open => "Open",
            ConnectionState::Closing => "Closing",
            ConnectionState::Closed => "Closed",
        };
        f.write_str(name)
    }
}

/// Per-connection metadata and state
///
/// `M` is the caller's metadata value type; the core never inspects it.
/// A `Connection` is not internally synchronized: callers sharing one
/// across threads provide their own serialization.
#[derive(Debug)]
pub struct Connection<M = ()> {
    id: String,
    remote_addr: String,
    state: ConnectionState,
    last_activity: Instant,
    metadata: HashMap<String, M>,
}

impl<M> Connection<M> {
    /// Create a connection in the Connecting state with a fresh
    /// activity stamp and empty metadata
    pub fn new(id: impl Into<String>, remote_addr: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            remote_addr: remote_addr.into(),
            state: ConnectionState::Connecting,
            last_activity: Instant::now(),
            metadata: HashMap::new(),
        }
    }

    /// Caller-assigned connection identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display string of the peer endpoint
    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Time of the last observed peer I/O
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Check if the transition to `new_state` is permitted
    ///
    /// Connecting → {Open, Closed}; Open → {Closing, Closed};
    /// Closing → {Closed}; Closed → nothing. Self-loops are rejected.
    pub fn can_transition_to(&self, new_state: ConnectionState) -> bool {
        use ConnectionState::*;
        match self.state {
            Connecting => matches!(new_state, Open | Closed),
            Open => matches!(new_state, Closing | Closed),
            Closing => matches!(new_state, Closed),
            Closed => false,
        }
    }

    /// Apply a state transition
    ///
    /// On a disallowed transition returns [`Error::InvalidState`] naming
    /// both states and leaves the current state unchanged.
    pub fn transition_to(&mut self, new_state: ConnectionState) -> Result<()> {
        if !self.can_transition_to(new_state) {
            return Err(Error::InvalidState {
                from: self.state,
                to: new_state,
            });
        }
        self.state = new_state;
        Ok(())
    }

    /// Stamp `last_activity` with the current time
    ///
    /// Permitted in any state; on a Closed connection it is a no-op
    /// contract with the caller.
    pub fn update_activity(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Check if the connection is open
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Check if the connection is closing
    pub fn is_closing(&self) -> bool {
        self.state == ConnectionState::Closing
    }

    /// Check if the connection is closed
    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Attach a metadata value, returning the previous one if present
    pub fn set_metadata(&mut self, key: impl Into<String>, value: M) -> Option<M> {
        self.metadata.insert(key.into(), value)
    }

    /// Look up a metadata value
    pub fn metadata(&self, key: &str) -> Option<&M> {
        self.metadata.get(key)
    }

    /// Remove a metadata value
    pub fn remove_metadata(&mut self, key: &str) -> Option<M> {
        self.metadata.remove(key)
    }
}

//! Connection state tracking
//!
//! The observed connection status, derived from whether pppd is running
//! and (in the GUI) whether a tunnel interface has appeared. Shared
//! between the supervisor tasks and the front-end.

use std::sync::{Arc, Mutex};

/// Observed connection status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No pppd process for this handle
    #[default]
    Disconnected,

    /// pppd is running, tunnel not confirmed yet
    Connecting,

    /// A tunnel interface is up
    Connected,

    /// Graceful termination requested, pppd still running
    Disconnecting,

    /// The attempt failed
    Error(String),
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Disconnecting => write!(f, "disconnecting"),
            ConnectionState::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

/// Thread-safe connection state shared across tasks
#[derive(Debug, Clone, Default)]
pub struct SharedConnectionState(Arc<Mutex<ConnectionState>>);

impl SharedConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state
    pub fn get(&self) -> ConnectionState {
        self.0.lock().unwrap().clone()
    }

    /// Replace the current state
    pub fn set(&self, state: ConnectionState) {
        let mut guard = self.0.lock().unwrap();
        if *guard != state {
            tracing::debug!(from = %*guard, to = %state, "connection state changed");
            *guard = state;
        }
    }

    /// Whether a tunnel is confirmed up
    pub fn is_connected(&self) -> bool {
        matches!(self.get(), ConnectionState::Connected)
    }

    /// Whether a dial attempt is in flight (connecting or connected)
    pub fn is_active(&self) -> bool {
        matches!(
            self.get(),
            ConnectionState::Connecting | ConnectionState::Connected | ConnectionState::Disconnecting
        )
    }
}

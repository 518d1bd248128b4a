//! Connection event types for the dialing lifecycle
//!
//! Events emitted by the supervisor while pppd runs. Every output line
//! becomes an `Output` event; lines the parser recognizes additionally
//! produce a semantic event.

use crate::error::VpnError;
use std::net::IpAddr;

/// Events emitted during a pppd dialing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialerEvent {
    /// pppd process spawned successfully
    ProcessStarted { pid: u32 },

    /// One verbatim line of combined pppd output
    Output { line: String },

    /// pppd attached a ppp interface ("Using interface ppp0")
    InterfaceUp { device: String },

    /// Local end of the link got its address
    LocalAddress { address: IpAddr },

    /// Remote end of the link reported its address
    RemoteAddress { address: IpAddr },

    /// CHAP/PAP/MS-CHAP authentication succeeded
    AuthenticationSucceeded { protocol: String },

    /// MPPE encryption negotiated
    EncryptionEnabled { description: String },

    /// The link went down ("Connection terminated", "Modem hangup")
    LinkTerminated,

    /// pppd exited; `code` is None when it was killed by a signal
    Disconnected { code: Option<i32> },

    /// A graceful termination request outlived its grace period
    TerminationTimedOut,

    /// pppd reported a fatal condition
    Error { kind: VpnError, line: String },
}

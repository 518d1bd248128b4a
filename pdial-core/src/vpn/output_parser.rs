//! Pattern-based parser for pppd output
//!
//! Extracts semantic DialerEvents from pppd's log lines using regex
//! patterns. Unrecognized lines yield no event; the supervisor forwards
//! every line verbatim regardless, so nothing is lost.

use crate::error::VpnError;
use crate::vpn::DialerEvent;
use regex::Regex;
use std::net::IpAddr;

/// Parser for pppd output lines
pub struct OutputParser {
    /// Pattern for "Using interface ppp0"
    interface_pattern: Regex,
    /// Pattern for "local  IP address 10.0.0.5"
    local_addr_pattern: Regex,
    /// Pattern for "remote IP address 10.0.0.1"
    remote_addr_pattern: Regex,
    /// Pattern for "CHAP authentication succeeded"
    auth_ok_pattern: Regex,
    /// Pattern for authentication failures
    auth_failed_pattern: Regex,
    /// Pattern for "MPPE 128-bit stateful compression enabled"
    mppe_pattern: Regex,
    /// Pattern for link teardown messages
    terminated_pattern: Regex,
    /// Pattern for fatal startup conditions
    fatal_pattern: Regex,
}

impl OutputParser {
    /// Create a new OutputParser with compiled regex patterns
    pub fn new() -> Self {
        Self {
            interface_pattern: Regex::new(r"Using interface (\S+)")
                .expect("Failed to compile interface pattern"),
            local_addr_pattern: Regex::new(r"local\s+IP address (\S+)")
                .expect("Failed to compile local address pattern"),
            remote_addr_pattern: Regex::new(r"remote IP address (\S+)")
                .expect("Failed to compile remote address pattern"),
            auth_ok_pattern: Regex::new(r"(CHAP|MS-CHAP(?:-v2)?|PAP) authentication succeeded")
                .expect("Failed to compile auth success pattern"),
            auth_failed_pattern: Regex::new(
                r"authentication failed|Failed to authenticate ourselves to peer",
            )
            .expect("Failed to compile auth failure pattern"),
            mppe_pattern: Regex::new(r"MPPE \d+-bit (?:stateful|stateless) compression enabled")
                .expect("Failed to compile MPPE pattern"),
            terminated_pattern: Regex::new(r"Connection terminated|Modem hangup")
                .expect("Failed to compile termination pattern"),
            fatal_pattern: Regex::new(
                r"Couldn't open the /dev/ppp device|must be run with root|pty option precludes|[Cc]onnect script failed",
            )
            .expect("Failed to compile fatal pattern"),
        }
    }

    /// Parse a line of pppd output
    ///
    /// Returns the semantic event the line maps to, or None for lines
    /// that are just chatter.
    pub fn parse_line(&self, line: &str) -> Option<DialerEvent> {
        if let Some(captures) = self.interface_pattern.captures(line) {
            return Some(DialerEvent::InterfaceUp {
                device: captures[1].to_string(),
            });
        }

        if let Some(captures) = self.local_addr_pattern.captures(line) {
            if let Ok(address) = captures[1].parse::<IpAddr>() {
                return Some(DialerEvent::LocalAddress { address });
            }
        }

        if let Some(captures) = self.remote_addr_pattern.captures(line) {
            if let Ok(address) = captures[1].parse::<IpAddr>() {
                return Some(DialerEvent::RemoteAddress { address });
            }
        }

        // Failure check first: "CHAP authentication failed" must not be
        // shadowed by the success pattern's protocol capture
        if self.auth_failed_pattern.is_match(line) {
            return Some(DialerEvent::Error {
                kind: VpnError::AuthenticationFailed,
                line: line.to_string(),
            });
        }

        if let Some(captures) = self.auth_ok_pattern.captures(line) {
            return Some(DialerEvent::AuthenticationSucceeded {
                protocol: captures[1].to_string(),
            });
        }

        if let Some(found) = self.mppe_pattern.find(line) {
            return Some(DialerEvent::EncryptionEnabled {
                description: found.as_str().to_string(),
            });
        }

        if self.terminated_pattern.is_match(line) {
            return Some(DialerEvent::LinkTerminated);
        }

        if self.fatal_pattern.is_match(line) {
            return Some(DialerEvent::Error {
                kind: VpnError::ConnectionFailed {
                    reason: line.trim().to_string(),
                },
                line: line.to_string(),
            });
        }

        None
    }
}

impl Default for OutputParser {
    fn default() -> Self {
        Self::new()
    }
}

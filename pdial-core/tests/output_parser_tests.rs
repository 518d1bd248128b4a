// Tests for pppd output line parsing

use pdial_core::error::VpnError;
use pdial_core::vpn::{DialerEvent, OutputParser};
use std::net::IpAddr;

#[test]
fn test_interface_line() {
    let parser = OutputParser::new();
    assert_eq!(
        parser.parse_line("Using interface ppp0"),
        Some(DialerEvent::InterfaceUp {
            device: "ppp0".to_string()
        })
    );
}

#[test]
fn test_local_address_line() {
    // pppd pads "local" with two spaces to align with "remote"
    let parser = OutputParser::new();
    assert_eq!(
        parser.parse_line("local  IP address 10.0.0.5"),
        Some(DialerEvent::LocalAddress {
            address: "10.0.0.5".parse::<IpAddr>().unwrap()
        })
    );
}

#[test]
fn test_remote_address_line() {
    let parser = OutputParser::new();
    assert_eq!(
        parser.parse_line("remote IP address 10.0.0.1"),
        Some(DialerEvent::RemoteAddress {
            address: "10.0.0.1".parse::<IpAddr>().unwrap()
        })
    );
}

#[test]
fn test_chap_success() {
    let parser = OutputParser::new();
    assert_eq!(
        parser.parse_line("CHAP authentication succeeded"),
        Some(DialerEvent::AuthenticationSucceeded {
            protocol: "CHAP".to_string()
        })
    );
}

#[test]
fn test_mschap_v2_success() {
    let parser = OutputParser::new();
    assert_eq!(
        parser.parse_line("MS-CHAP-v2 authentication succeeded"),
        Some(DialerEvent::AuthenticationSucceeded {
            protocol: "MS-CHAP-v2".to_string()
        })
    );
}

#[test]
fn test_auth_failure_beats_success_pattern() {
    // "CHAP authentication failed" must not parse as a success
    let parser = OutputParser::new();
    match parser.parse_line("CHAP authentication failed") {
        Some(DialerEvent::Error { kind, line }) => {
            assert_eq!(kind, VpnError::AuthenticationFailed);
            assert_eq!(line, "CHAP authentication failed");
        }
        other => panic!("expected authentication error, got {:?}", other),
    }
}

#[test]
fn test_auth_failure_to_peer() {
    let parser = OutputParser::new();
    match parser.parse_line("Failed to authenticate ourselves to peer") {
        Some(DialerEvent::Error { kind, .. }) => {
            assert_eq!(kind, VpnError::AuthenticationFailed)
        }
        other => panic!("expected authentication error, got {:?}", other),
    }
}

#[test]
fn test_mppe_encryption_enabled() {
    let parser = OutputParser::new();
    assert_eq!(
        parser.parse_line("MPPE 128-bit stateful compression enabled"),
        Some(DialerEvent::EncryptionEnabled {
            description: "MPPE 128-bit stateful compression enabled".to_string()
        })
    );
}

#[test]
fn test_link_teardown_lines() {
    let parser = OutputParser::new();
    assert_eq!(
        parser.parse_line("Connection terminated."),
        Some(DialerEvent::LinkTerminated)
    );
    assert_eq!(
        parser.parse_line("Modem hangup"),
        Some(DialerEvent::LinkTerminated)
    );
}

#[test]
fn test_fatal_device_error() {
    let parser = OutputParser::new();
    match parser.parse_line("Couldn't open the /dev/ppp device: No such device") {
        Some(DialerEvent::Error {
            kind: VpnError::ConnectionFailed { reason },
            ..
        }) => assert!(reason.contains("/dev/ppp")),
        other => panic!("expected fatal error, got {:?}", other),
    }
}

#[test]
fn test_fatal_connect_script_failure() {
    let parser = OutputParser::new();
    assert!(matches!(
        parser.parse_line("Connect script failed"),
        Some(DialerEvent::Error {
            kind: VpnError::ConnectionFailed { .. },
            ..
        })
    ));
}

#[test]
fn test_unrecognized_chatter_yields_nothing() {
    let parser = OutputParser::new();
    assert_eq!(parser.parse_line("Script pty started (pid 1234)"), None);
    assert_eq!(parser.parse_line("sent [LCP ConfReq id=0x1]"), None);
    assert_eq!(parser.parse_line(""), None);
}

#[test]
fn test_unparseable_address_yields_nothing() {
    let parser = OutputParser::new();
    assert_eq!(parser.parse_line("local  IP address garbage"), None);
}

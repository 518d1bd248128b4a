// Tests for the tunnel connectivity monitor

use pdial_core::config::DialerSettings;
use pdial_core::vpn::{InterfaceMonitor, MonitorEvent};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::timeout;

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_listing_mentions_ip_link_style() {
    let listing = "1: lo: <LOOPBACK,UP> mtu 65536\n3: ppp0: <POINTOPOINT,UP> mtu 1320";
    assert_eq!(
        InterfaceMonitor::listing_mentions(listing, &names(&["ppp0", "ppp1"])),
        Some("ppp0".to_string())
    );
}

#[test]
fn test_listing_mentions_ifconfig_style() {
    let listing = "ppp1: flags=8051<UP,POINTOPOINT,RUNNING> mtu 1320\n\tinet 10.0.0.2";
    assert_eq!(
        InterfaceMonitor::listing_mentions(listing, &names(&["ppp0", "ppp1"])),
        Some("ppp1".to_string())
    );
}

#[test]
fn test_listing_does_not_match_prefixes() {
    // ppp10 must not satisfy a search for ppp1
    let listing = "5: ppp10: <POINTOPOINT,UP> mtu 1320";
    assert_eq!(
        InterfaceMonitor::listing_mentions(listing, &names(&["ppp0", "ppp1"])),
        None
    );
}

#[test]
fn test_listing_matches_names_with_separators() {
    // '-', '_' and '.' are all legal in Linux interface names
    let listing = "4: tun-vpn0: <POINTOPOINT,UP> mtu 1400\n5: veth_a.2: <UP>";
    assert_eq!(
        InterfaceMonitor::listing_mentions(listing, &names(&["tun-vpn0"])),
        Some("tun-vpn0".to_string())
    );
    assert_eq!(
        InterfaceMonitor::listing_mentions(listing, &names(&["veth_a.2"])),
        Some("veth_a.2".to_string())
    );
    // still whole-token: "tun-vpn0" must not satisfy a search for "vpn0"
    assert_eq!(
        InterfaceMonitor::listing_mentions(listing, &names(&["vpn0"])),
        None
    );
}

#[test]
fn test_listing_mentions_nothing_in_empty_output() {
    assert_eq!(
        InterfaceMonitor::listing_mentions("", &names(&["ppp0"])),
        None
    );
}

#[tokio::test]
async fn test_emits_connected_exactly_once_then_ends() {
    let monitor = InterfaceMonitor::new(&DialerSettings::default())
        .with_listing_command("echo", vec!["3: ppp0: <POINTOPOINT,UP>".to_string()])
        .with_interval(Duration::from_millis(50));

    let mut events = monitor.start();

    let first = timeout(Duration::from_secs(5), events.recv()).await.unwrap();
    assert_eq!(
        first,
        Some(MonitorEvent::TunnelUp {
            interface: "ppp0".to_string()
        })
    );

    // One-shot: the loop ends after the match and the channel closes.
    let second = timeout(Duration::from_secs(5), events.recv()).await.unwrap();
    assert_eq!(second, None);
}

#[tokio::test]
async fn test_no_event_without_a_tunnel_interface() {
    let monitor = InterfaceMonitor::new(&DialerSettings::default())
        .with_listing_command("echo", vec!["1: lo 2: eth0 3: wlan0".to_string()])
        .with_interval(Duration::from_millis(50));
    let stop = monitor.stop_handle();

    let mut events = monitor.start();

    let result = timeout(Duration::from_millis(300), events.recv()).await;
    assert!(result.is_err(), "no event should fire without a match");

    stop.store(true, Ordering::SeqCst);
}

#[tokio::test]
async fn test_stop_flag_ends_the_loop() {
    let monitor = InterfaceMonitor::new(&DialerSettings::default())
        .with_listing_command("echo", vec!["nothing here".to_string()])
        .with_interval(Duration::from_millis(50));
    let stop = monitor.stop_handle();

    let mut events = monitor.start();
    stop.store(true, Ordering::SeqCst);

    // The loop notices the flag on its next pass and drops the sender.
    let result = timeout(Duration::from_secs(5), events.recv()).await.unwrap();
    assert_eq!(result, None);
}

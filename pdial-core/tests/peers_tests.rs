// Tests for pppd peers file rendering and writing

use pdial_core::config::DialerSettings;
use pdial_core::types::Password;
use pdial_core::vpn::{render_peer_config, PeerWriter};
use std::fs;
use std::path::Path;

fn test_settings(dir: &Path) -> DialerSettings {
    DialerSettings {
        peers_dir: dir.join("peers"),
        options_path: dir.join("options"),
        ..Default::default()
    }
}

#[test]
fn test_render_substitutes_all_three_fields() {
    let rendered = render_peer_config("vpn.example.com", "alice", "s3cret");

    assert!(rendered.contains(r#"pty "pptp vpn.example.com --nolaunchpppd""#));
    assert!(rendered.contains("user alice"));
    assert!(rendered.contains("password s3cret"));
}

#[test]
fn test_render_is_byte_identical_for_identical_inputs() {
    let first = render_peer_config("10.1.2.3", "bob", "pw");
    let second = render_peer_config("10.1.2.3", "bob", "pw");
    assert_eq!(first, second);
}

#[test]
fn test_render_values_are_substituted_verbatim() {
    // No escaping or validation by design: pppd is the sole consumer.
    let rendered = render_peer_config("host", "a user", "p@ss word!");
    assert!(rendered.contains("user a user"));
    assert!(rendered.contains("password p@ss word!"));
}

#[test]
fn test_render_static_option_set() {
    let rendered = render_peer_config("host", "user", "pw");

    for option in [
        "mtu 1320",
        "idle 1800",
        "redialcount 1",
        "redialtimer 5",
        "require-mppe",
        "mppe-stateful",
        "refuse-eap",
        "defaultroute",
        "ms-dns 8.8.8.8",
        "usepeerdns",
        "nodetach",
        "hide-password",
    ] {
        assert!(rendered.contains(option), "missing option: {}", option);
    }
}

#[test]
fn test_prepare_creates_peers_dir_and_options_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(dir.path());
    let writer = PeerWriter::new(settings.clone());

    let had_stale = writer.prepare().unwrap();

    assert!(!had_stale);
    assert!(settings.peers_dir.is_dir());
    assert!(settings.options_path.is_file());
}

#[test]
fn test_prepare_removes_stale_peer_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(dir.path());
    fs::create_dir_all(&settings.peers_dir).unwrap();
    fs::write(settings.peer_path(), "stale contents").unwrap();

    let writer = PeerWriter::new(settings.clone());
    let had_stale = writer.prepare().unwrap();

    assert!(had_stale);
    assert!(!settings.peer_path().exists());
}

#[test]
fn test_prepare_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(dir.path());
    let writer = PeerWriter::new(settings);

    assert!(!writer.prepare().unwrap());
    assert!(!writer.prepare().unwrap());
}

#[test]
fn test_write_produces_the_rendered_document() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(dir.path());
    let writer = PeerWriter::new(settings.clone());
    writer.prepare().unwrap();

    writer
        .write("vpn.example.com", "alice", &Password::from("s3cret"))
        .unwrap();

    let contents = fs::read_to_string(settings.peer_path()).unwrap();
    assert_eq!(contents, render_peer_config("vpn.example.com", "alice", "s3cret"));
}

#[test]
fn test_write_overwrites_previous_config() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(dir.path());
    let writer = PeerWriter::new(settings.clone());
    writer.prepare().unwrap();

    writer.write("first.example.com", "alice", &Password::from("one")).unwrap();
    writer.write("second.example.com", "bob", &Password::from("two")).unwrap();

    let contents = fs::read_to_string(settings.peer_path()).unwrap();
    assert!(contents.contains("second.example.com"));
    assert!(contents.contains("user bob"));
    assert!(!contents.contains("first.example.com"));
}

#[test]
fn test_write_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(dir.path());
    let writer = PeerWriter::new(settings.clone());
    writer.prepare().unwrap();

    writer.write("host", "user", &Password::from("pw")).unwrap();

    let entries: Vec<_> = fs::read_dir(&settings.peers_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("macpptp")]);
}

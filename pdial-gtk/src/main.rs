//! pdial-gtk - PPTP dialer GUI
//!
//! GTK4 + libadwaita front-end around pdial-core: credential entry, a
//! connect/disconnect toggle and a live transcript of pppd output.

use gtk4::prelude::*;
use libadwaita as adw;

mod ui;

const APP_ID: &str = "com.github.pdial";

fn main() {
    if let Err(e) = pdial_core::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    // Same requirement as the CLI: peers files live under /etc/ppp.
    if let Err(e) = pdial_core::privilege::ensure_root() {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    // Initialize Tokio runtime for the supervisor and monitor tasks
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    // Enter the runtime context so async operations work
    let _guard = runtime.enter();

    gtk4::init().expect("Failed to initialize GTK");
    adw::init().expect("Failed to initialize libadwaita");

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(|app| {
        let window = ui::window::build(app);
        window.present();
    });

    app.run();
}

//! Main application window
//!
//! A single window: username/password/endpoint entries, one
//! connect/disconnect toggle and a read-only transcript of pppd output.
//! Nothing is persisted between runs.
//!
//! The supervisor and monitor run on the Tokio runtime; their event
//! receivers are drained on the GTK main context via spawn_local, so
//! all widget access stays on the UI thread.

use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pdial_core::config::toml_config::load_settings;
use pdial_core::config::DialerSettings;
use pdial_core::types::Password;
use pdial_core::vpn::{
    process, ConnectionState, DialerEvent, InterfaceMonitor, MonitorEvent, PeerWriter,
    PppdSupervisor,
};

/// Shared application state
struct AppState {
    settings: DialerSettings,
    /// Supervisor of the active dial attempt, if any
    supervisor: RefCell<Option<PppdSupervisor>>,
    /// Stop flag of the active connectivity monitor, if any
    monitor_stop: RefCell<Option<Arc<AtomicBool>>>,
}

/// Widget handles shared between the handlers
#[derive(Clone)]
struct Widgets {
    button: gtk4::Button,
    status: gtk4::Label,
    transcript: gtk4::TextView,
    username: gtk4::Entry,
    password: gtk4::PasswordEntry,
    endpoint: gtk4::Entry,
}

/// Build the main application window
pub fn build(app: &adw::Application) -> adw::ApplicationWindow {
    let settings = load_settings().unwrap_or_else(|e| {
        tracing::warn!("failed to load settings, using defaults: {}", e);
        DialerSettings::default()
    });

    let state = Rc::new(AppState {
        settings,
        supervisor: RefCell::new(None),
        monitor_stop: RefCell::new(None),
    });

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("PPTP Dialer")
        .default_width(480)
        .default_height(600)
        .build();

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content.set_margin_start(12);
    content.set_margin_end(12);

    let username = gtk4::Entry::new();
    username.set_placeholder_text(Some("Username"));
    content.append(&gtk4::Label::builder().label("Username:").halign(gtk4::Align::Start).build());
    content.append(&username);

    let password = gtk4::PasswordEntry::new();
    password.set_show_peek_icon(true);
    content.append(&gtk4::Label::builder().label("Password:").halign(gtk4::Align::Start).build());
    content.append(&password);

    let endpoint = gtk4::Entry::new();
    endpoint.set_placeholder_text(Some("vpn.example.com"));
    content.append(&gtk4::Label::builder().label("Endpoint:").halign(gtk4::Align::Start).build());
    content.append(&endpoint);

    let button = gtk4::Button::with_label("Connect");
    button.add_css_class("suggested-action");
    content.append(&button);

    let status = gtk4::Label::builder().label("Disconnected").halign(gtk4::Align::Start).build();
    status.add_css_class("dim-label");
    content.append(&status);

    let transcript = gtk4::TextView::new();
    transcript.set_editable(false);
    transcript.set_cursor_visible(false);
    transcript.set_monospace(true);

    let scroll = gtk4::ScrolledWindow::builder()
        .vexpand(true)
        .child(&transcript)
        .build();
    content.append(&scroll);

    let widgets = Widgets {
        button: button.clone(),
        status,
        transcript,
        username,
        password,
        endpoint,
    };

    {
        let state = Rc::clone(&state);
        let widgets = widgets.clone();
        button.connect_clicked(move |_| {
            let dialing = state.supervisor.borrow().is_some();
            if dialing {
                stop_dial(&state, &widgets);
            } else {
                start_dial(Rc::clone(&state), widgets.clone());
            }
        });
    }

    let header = adw::HeaderBar::new();
    let toolbar = adw::ToolbarView::new();
    toolbar.add_top_bar(&header);
    toolbar.set_content(Some(&content));
    window.set_content(Some(&toolbar));

    window
}

/// Append one line to the transcript view
fn append_line(view: &gtk4::TextView, line: &str) {
    let buffer = view.buffer();
    let mut end = buffer.end_iter();
    buffer.insert(&mut end, line);
    buffer.insert(&mut end, "\n");
}

/// Reset the UI and drop the per-attempt state
fn reset_ui(state: &Rc<AppState>, widgets: &Widgets) {
    if let Some(stop) = state.monitor_stop.borrow_mut().take() {
        stop.store(true, Ordering::SeqCst);
    }
    state.supervisor.borrow_mut().take();
    widgets.button.set_label("Connect");
    widgets.status.set_text("Disconnected");
}

/// Report a failed dial attempt and reset
fn fail_dial(state: &Rc<AppState>, widgets: &Widgets, message: &str) {
    append_line(&widgets.transcript, message);
    reset_ui(state, widgets);
}

/// Kick off a dial attempt: write config, spawn pppd, stream its output
fn start_dial(state: Rc<AppState>, widgets: Widgets) {
    let username = widgets.username.text().to_string();
    let endpoint = widgets.endpoint.text().to_string();
    let password = Password::new(widgets.password.text().to_string());

    if username.is_empty() || endpoint.is_empty() {
        widgets.status.set_text("Username and endpoint are required");
        return;
    }

    let supervisor = PppdSupervisor::new(&state.settings);
    let conn_state = supervisor.state();
    state.supervisor.replace(Some(supervisor.clone()));

    let monitor = InterfaceMonitor::new(&state.settings);
    state.monitor_stop.replace(Some(monitor.stop_handle()));

    widgets.button.set_label("Disconnect");
    widgets.status.set_text("Connecting ...");

    // Tunnel side: one-shot connected event from the interface monitor
    {
        let widgets = widgets.clone();
        let endpoint = endpoint.clone();
        let conn_state = conn_state.clone();
        let mut monitor_rx = monitor.start();
        glib::MainContext::default().spawn_local(async move {
            if let Some(MonitorEvent::TunnelUp { interface }) = monitor_rx.recv().await {
                conn_state.set(ConnectionState::Connected);
                widgets.status.set_text(&format!("Connected ({})", interface));
                append_line(&widgets.transcript, &format!("Connected to {}", endpoint));
            }
        });
    }

    // Daemon side: prepare, write, spawn, then drain events until exit
    let settings = state.settings.clone();
    glib::MainContext::default().spawn_local(async move {
        let writer = PeerWriter::new(settings.clone());

        match writer.prepare() {
            Ok(true) => {
                append_line(
                    &widgets.transcript,
                    "Old configuration exists, resetting stale pppd state",
                );
                if let Err(e) = process::reset_stale_state(&settings.daemon_process_name).await {
                    append_line(&widgets.transcript, &format!("Stale state reset failed: {}", e));
                }
            }
            Ok(false) => {}
            Err(e) => {
                conn_state.set(ConnectionState::Error(e.to_string()));
                fail_dial(&state, &widgets, &format!("Prepare failed: {}", e));
                return;
            }
        }

        if let Err(e) = writer.write(&endpoint, &username, &password) {
            conn_state.set(ConnectionState::Error(e.to_string()));
            fail_dial(&state, &widgets, &format!("Writing configuration failed: {}", e));
            return;
        }

        let mut events = match supervisor.start().await {
            Ok(events) => events,
            Err(e) => {
                // spawn failure already moved the shared state to Error
                fail_dial(&state, &widgets, &format!("Starting pppd failed: {}", e));
                return;
            }
        };

        while let Some(event) = events.recv().await {
            match event {
                DialerEvent::Output { line } => append_line(&widgets.transcript, &line),
                DialerEvent::Disconnected { code } => {
                    match code {
                        Some(code) => append_line(
                            &widgets.transcript,
                            &format!("pppd exited with code {}", code),
                        ),
                        None => {
                            append_line(&widgets.transcript, "pppd was terminated by a signal")
                        }
                    }
                    append_line(&widgets.transcript, "Disconnected");
                    reset_ui(&state, &widgets);
                    break;
                }
                DialerEvent::TerminationTimedOut => {
                    append_line(&widgets.transcript, "pppd did not terminate in time");
                }
                event => tracing::debug!(?event, "connection event"),
            }
        }
    });
}

/// Request termination of the running attempt
fn stop_dial(state: &Rc<AppState>, widgets: &Widgets) {
    let Some(supervisor) = state.supervisor.borrow().clone() else {
        return;
    };
    let grace = state.settings.grace_period();
    widgets.status.set_text("Disconnecting ...");

    let widgets = widgets.clone();
    glib::MainContext::default().spawn_local(async move {
        match supervisor.terminate(grace).await {
            Ok(true) => {} // the event loop resets the UI on Disconnected
            Ok(false) => {
                // the timeout itself is already reported via the event loop
                append_line(&widgets.transcript, "Killing pppd");
                let _ = supervisor.force_kill().await;
            }
            Err(e) => append_line(&widgets.transcript, &format!("Disconnect failed: {}", e)),
        }
    });
}

//! pppd process supervision
//!
//! Spawns pppd as a child process, drains its stdout and stderr
//! line-by-line into an event channel, and polls its liveness until it
//! exits or the caller requests termination. A supervisor handle is
//! single-use: one dial attempt per handle, a re-dial constructs a new
//! one.

use crate::config::DialerSettings;
use crate::error::VpnError;
use crate::vpn::{ConnectionState, DialerEvent, OutputParser, SharedConnectionState};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Command line used to launch the supervised daemon
///
/// Defaults to `pppd call <peer>`; tests substitute a stub.
#[derive(Debug, Clone)]
pub struct DialCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DialCommand {
    pub fn from_settings(settings: &DialerSettings) -> Self {
        Self {
            program: settings.pppd_program.clone(),
            args: vec!["call".to_string(), settings.peer_name.clone()],
        }
    }

    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// How the supervised process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, or None when the process was killed by a signal
    pub code: Option<i32>,
}

/// Supervises a single pppd child process
///
/// Cheaply cloneable: all mutable state sits behind Arcs, so a front-end
/// can hold one clone in its event loop and hand another to a disconnect
/// handler. Termination is safe to invoke concurrently with the liveness
/// poll; the child handle is locked only for brief try_wait calls.
#[derive(Clone)]
pub struct PppdSupervisor {
    command: DialCommand,
    poll_interval: Duration,
    state: SharedConnectionState,
    child: Arc<Mutex<Option<Child>>>,
    pid: Arc<Mutex<Option<u32>>>,
    exit_info: Arc<Mutex<Option<ExitInfo>>>,
    event_tx: Arc<Mutex<Option<mpsc::UnboundedSender<DialerEvent>>>>,
}

impl PppdSupervisor {
    /// Create a supervisor that will run `pppd call <peer>`
    pub fn new(settings: &DialerSettings) -> Self {
        Self::with_command(DialCommand::from_settings(settings), settings.liveness_poll_interval())
    }

    /// Create a supervisor around an arbitrary daemon command
    pub fn with_command(command: DialCommand, poll_interval: Duration) -> Self {
        Self {
            command,
            poll_interval,
            state: SharedConnectionState::new(),
            child: Arc::new(Mutex::new(None)),
            pid: Arc::new(Mutex::new(None)),
            exit_info: Arc::new(Mutex::new(None)),
            event_tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared connection state for this dial attempt
    pub fn state(&self) -> SharedConnectionState {
        self.state.clone()
    }

    /// PID of the running daemon, if any
    pub async fn pid(&self) -> Option<u32> {
        *self.pid.lock().await
    }

    /// Spawn the daemon and start the reader and liveness tasks
    ///
    /// Returns the event receiver immediately; the spawn itself is the
    /// only blocking part. Fails when the handle was already used or the
    /// daemon binary cannot be started.
    pub async fn start(&self) -> Result<mpsc::UnboundedReceiver<DialerEvent>, VpnError> {
        {
            let pid_guard = self.pid.lock().await;
            if pid_guard.is_some() {
                return Err(VpnError::ConnectionFailed {
                    reason: "supervisor handle already used; construct a new one to re-dial"
                        .to_string(),
                });
            }
        }

        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            let reason = format!("Failed to spawn {}: {}", self.command.program, e);
            self.state.set(ConnectionState::Error(reason.clone()));
            VpnError::ProcessSpawnError { reason }
        })?;

        let pid = child.id().ok_or_else(|| VpnError::ProcessSpawnError {
            reason: "daemon exited before a PID could be observed".to_string(),
        })?;

        info!(pid, program = %self.command.program, "daemon spawned");
        self.state.set(ConnectionState::Connecting);

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let _ = event_tx.send(DialerEvent::ProcessStarted { pid });

        let stdout = child.stdout.take().ok_or_else(|| VpnError::ProcessSpawnError {
            reason: "Failed to capture stdout".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| VpnError::ProcessSpawnError {
            reason: "Failed to capture stderr".to_string(),
        })?;

        let stdout_task = Self::spawn_reader(stdout, event_tx.clone());
        let stderr_task = Self::spawn_reader(stderr, event_tx.clone());

        {
            let mut pid_guard = self.pid.lock().await;
            *pid_guard = Some(pid);
        }
        {
            let mut child_guard = self.child.lock().await;
            *child_guard = Some(child);
        }
        {
            let mut tx_guard = self.event_tx.lock().await;
            *tx_guard = Some(event_tx.clone());
        }

        self.spawn_liveness_poll(event_tx, stdout_task, stderr_task);

        Ok(event_rx)
    }

    /// Forward each line of one output stream as an event
    ///
    /// Every line becomes an `Output` event; lines the parser recognizes
    /// additionally produce their semantic event. Ends when the stream
    /// closes, which happens when the daemon exits.
    fn spawn_reader<R>(
        stream: R,
        event_tx: mpsc::UnboundedSender<DialerEvent>,
    ) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let parser = OutputParser::new();
            let reader = BufReader::new(stream);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!("pppd: {}", line);
                let semantic = parser.parse_line(&line);

                if event_tx.send(DialerEvent::Output { line }).is_err() {
                    warn!("event receiver dropped, stopping output reader");
                    break;
                }

                if let Some(event) = semantic {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        })
    }

    /// Poll the child's liveness at a fixed short interval
    ///
    /// On exit, waits for both readers to drain their streams before
    /// emitting `Disconnected`, so output events always precede it.
    fn spawn_liveness_poll(
        &self,
        event_tx: mpsc::UnboundedSender<DialerEvent>,
        stdout_task: JoinHandle<()>,
        stderr_task: JoinHandle<()>,
    ) {
        let child = Arc::clone(&self.child);
        let exit_info = Arc::clone(&self.exit_info);
        let state = self.state.clone();
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let status = loop {
                {
                    let mut child_guard = child.lock().await;
                    let Some(running) = child_guard.as_mut() else {
                        return;
                    };
                    match running.try_wait() {
                        Ok(Some(status)) => break status,
                        Ok(None) => {}
                        Err(e) => {
                            warn!("liveness poll failed: {}", e);
                            return;
                        }
                    }
                }
                tokio::time::sleep(poll_interval).await;
            };

            // Streams hit EOF once the child is gone; drain them fully
            // so no output line is lost or reordered past Disconnected.
            let _ = stdout_task.await;
            let _ = stderr_task.await;

            let info = ExitInfo {
                code: status.code(),
            };
            {
                let mut exit_guard = exit_info.lock().await;
                *exit_guard = Some(info);
            }
            {
                let mut child_guard = child.lock().await;
                *child_guard = None;
            }

            info!(code = ?info.code, "daemon exited");
            state.set(ConnectionState::Disconnected);
            let _ = event_tx.send(DialerEvent::Disconnected { code: info.code });
        });
    }

    /// Block until the daemon exits and return how it ended
    ///
    /// Polls the recorded exit status at the liveness interval, so the
    /// future is cancellable at every tick.
    pub async fn wait(&self) -> Result<ExitInfo, VpnError> {
        {
            let pid_guard = self.pid.lock().await;
            if pid_guard.is_none() {
                return Err(VpnError::NotRunning);
            }
        }

        loop {
            {
                let exit_guard = self.exit_info.lock().await;
                if let Some(info) = *exit_guard {
                    return Ok(info);
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Request graceful termination and wait up to `grace` for it
    ///
    /// Sends SIGTERM and reports whether the daemon exited within the
    /// grace period. Never force-kills on its own; on timeout it emits
    /// `TerminationTimedOut` and returns false, leaving escalation to an
    /// explicit `force_kill` call.
    pub async fn terminate(&self, grace: Duration) -> Result<bool, VpnError> {
        let pid = {
            let pid_guard = self.pid.lock().await;
            pid_guard.ok_or(VpnError::NotRunning)?
        };

        if self.exited().await {
            return Ok(true);
        }

        self.state.set(ConnectionState::Disconnecting);
        info!(pid, "sending SIGTERM to daemon");

        match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) => {}
            Err(nix::errno::Errno::ESRCH) => return Ok(true),
            Err(e) => {
                warn!("failed to send SIGTERM: {}", e);
                return Err(VpnError::TerminationError);
            }
        }

        let deadline = Instant::now() + grace;
        loop {
            if self.exited().await {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                warn!(pid, "daemon did not terminate within {:?}", grace);
                self.emit(DialerEvent::TerminationTimedOut).await;
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    /// Escalate to SIGKILL
    ///
    /// Explicit opt-in step for callers whose `terminate` timed out. The
    /// liveness poll picks up the exit and emits `Disconnected` as usual.
    pub async fn force_kill(&self) -> Result<(), VpnError> {
        let pid = {
            let pid_guard = self.pid.lock().await;
            pid_guard.ok_or(VpnError::NotRunning)?
        };

        if self.exited().await {
            return Ok(());
        }

        warn!(pid, "sending SIGKILL to daemon");
        match kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) | Err(nix::errno::Errno::ESRCH) => Ok(()),
            Err(e) => {
                warn!("failed to send SIGKILL: {}", e);
                Err(VpnError::TerminationError)
            }
        }
    }

    async fn exited(&self) -> bool {
        self.exit_info.lock().await.is_some()
    }

    async fn emit(&self, event: DialerEvent) {
        let tx_guard = self.event_tx.lock().await;
        if let Some(tx) = tx_guard.as_ref() {
            let _ = tx.send(event);
        }
    }
}

//! Stopping and relaunching the desktop shell.
//!
//! [`Restarter`] walks a small state machine:
//!
//! ```text
//! NotRunning ─────────────────────────────────────────────┐
//! Running → SignalSent → Exited ──────────────────────────┤
//!                      → StillRunning → ForceSignalSent ──┤
//!                                                         └→ Relaunched → Verified
//!                                                                       → NotVerified
//! ```
//!
//! Nothing notifies us when a process starts or exits; every transition
//! after a signal or a launch is observed by listing processes again
//! after a fixed delay.  The whole operation is best-effort and the caller
//! is expected to log a [`RestartError`] rather than abort.

use crate::config::RestartConfig;
use crate::traits::{ProcessControl, Signal};
use log::{debug, info, warn};
use std::time::Duration;

/// States the restart passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartState {
    /// No matching process was found; the shell is just launched.
    NotRunning,
    /// At least one matching process was found.
    Running,
    /// `SIGTERM` was sent to every match.
    SignalSent,
    /// All matches were gone after the grace period.
    Exited,
    /// Some matches survived the grace period.
    StillRunning,
    /// `SIGKILL` was sent to the survivors.
    ForceSignalSent,
    /// A fresh instance was launched.
    Relaunched,
    /// The relaunched shell showed up in the process list.
    Verified,
    /// The relaunched shell was not running after the verify delay.
    NotVerified,
}

/// What happened during a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestartReport {
    /// Every state visited, in order.
    pub states: Vec<RestartState>,
    /// Processes that received `SIGTERM`.
    pub terminated: Vec<u32>,
    /// Processes that needed `SIGKILL`.
    pub killed: Vec<u32>,
}

impl RestartReport {
    pub fn final_state(&self) -> Option<RestartState> {
        self.states.last().copied()
    }

    /// Whether the relaunched shell was seen running.
    pub fn verified(&self) -> bool {
        self.final_state() == Some(RestartState::Verified)
    }

    fn enter(&mut self, state: RestartState) {
        debug!("restart: {:?}", state);
        self.states.push(state);
    }
}

/// Errors from a restart attempt.
#[derive(Debug, thiserror::Error)]
pub enum RestartError {
    #[error("failed to list {name} processes: {reason}")]
    List { name: String, reason: String },
    #[error("failed to launch {name}: {reason}")]
    Launch { name: String, reason: String },
}

/// Stops every instance of an executable and launches a new one, through
/// any [`ProcessControl`] backend.
pub struct Restarter<P: ProcessControl> {
    control: P,
    grace: Duration,
    kill_wait: Duration,
    relaunch: bool,
    verify: Duration,
}

impl<P: ProcessControl> Restarter<P> {
    pub fn new(control: P, config: &RestartConfig) -> Self {
        Self {
            control,
            grace: Duration::from_millis(config.grace_ms),
            kill_wait: Duration::from_millis(config.kill_wait_ms),
            relaunch: config.relaunch,
            verify: Duration::from_millis(config.verify_ms),
        }
    }

    /// Access the underlying backend.
    pub fn control(&self) -> &P {
        &self.control
    }

    /// Restart every process named `name`.
    ///
    /// Failing to signal an individual process is only logged; a process
    /// that cannot be stopped shows up again in the second listing.  Failing to
    /// list processes or to launch the new instance is an error.  A shell
    /// that does not come up after launching ends in
    /// [`RestartState::NotVerified`], which is reported but not an error.
    pub fn restart(&self, name: &str) -> Result<RestartReport, RestartError> {
        let mut report = RestartReport::default();

        let running = self.list(name)?;
        if running.is_empty() {
            info!("{} is not running", name);
            report.enter(RestartState::NotRunning);
        } else {
            report.enter(RestartState::Running);
            for &pid in &running {
                if self.send(pid, Signal::Terminate) {
                    report.terminated.push(pid);
                }
            }
            report.enter(RestartState::SignalSent);

            std::thread::sleep(self.grace);

            let survivors = self.list(name)?;
            if survivors.is_empty() {
                info!("stopped {} ({} process(es))", name, running.len());
                report.enter(RestartState::Exited);
            } else {
                warn!(
                    "{} process(es) of {} still running after {:?}, killing",
                    survivors.len(),
                    name,
                    self.grace
                );
                report.enter(RestartState::StillRunning);
                for &pid in &survivors {
                    if self.send(pid, Signal::Kill) {
                        report.killed.push(pid);
                    }
                }
                report.enter(RestartState::ForceSignalSent);
                std::thread::sleep(self.kill_wait);
            }
        }

        if self.relaunch {
            self.control
                .spawn_detached(name)
                .map_err(|e| RestartError::Launch {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            info!("relaunched {}", name);
            report.enter(RestartState::Relaunched);

            // The launch already happened, so a failed listing here only
            // downgrades the result.
            std::thread::sleep(self.verify);
            match self.list(name) {
                Ok(pids) if !pids.is_empty() => {
                    info!("{} is running again", name);
                    report.enter(RestartState::Verified);
                }
                Ok(_) => {
                    warn!("{} does not appear to be running after relaunch", name);
                    report.enter(RestartState::NotVerified);
                }
                Err(e) => {
                    warn!("could not verify relaunch: {}", e);
                    report.enter(RestartState::NotVerified);
                }
            }
        }

        Ok(report)
    }

    fn list(&self, name: &str) -> Result<Vec<u32>, RestartError> {
        self.control
            .list_matching(name)
            .map_err(|e| RestartError::List {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Send `signal`, logging instead of failing.  Returns whether it was
    /// delivered.
    fn send(&self, pid: u32, signal: Signal) -> bool {
        match self.control.signal(pid, signal) {
            Ok(()) => {
                debug!("sent {} to {}", signal, pid);
                true
            }
            Err(e) => {
                warn!("failed to send {} to {}: {}", signal, pid, e);
                false
            }
        }
    }
}

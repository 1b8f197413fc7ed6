//! [`ProcessControl`] implementation backed by the live process table.
//!
//! Processes are enumerated and signalled through `sysinfo`.  Each call
//! takes a fresh snapshot, so a second listing after a grace period sees the
//! processes that actually exited.

use crate::traits::{ProcessControl, Signal};
use log::debug;
use std::ffi::OsStr;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use sysinfo::{Pid, Process, System};

/// The real process table.
#[derive(Debug, Default)]
pub struct SystemProcesses;

/// Errors from signalling or launching processes.
#[derive(Debug, thiserror::Error)]
pub enum SystemProcessError {
    #[error("process {0} not found")]
    NoSuchProcess(u32),
    #[error("{signal} not supported on this platform")]
    Unsupported { signal: Signal },
    #[error("failed to send {signal} to process {pid}")]
    SignalFailed { pid: u32, signal: Signal },
    #[error("failed to launch {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl SystemProcesses {
    pub fn new() -> Self {
        Self
    }
}

/// A process matches on its name or on the file name of its executable.
/// Kernel process names are truncated, so the executable is the reliable
/// fallback for long names.
fn is_match(process: &Process, name: &str) -> bool {
    let name = OsStr::new(name);
    process.name() == name || process.exe().and_then(Path::file_name) == Some(name)
}

fn to_sysinfo(signal: Signal) -> sysinfo::Signal {
    match signal {
        Signal::Terminate => sysinfo::Signal::Term,
        Signal::Kill => sysinfo::Signal::Kill,
    }
}

impl ProcessControl for SystemProcesses {
    type Error = SystemProcessError;

    /// Matching processes, excluding this one.  On Linux the process table
    /// also carries one entry per thread; those are skipped so each process
    /// is signalled once.
    fn list_matching(&self, name: &str) -> Result<Vec<u32>, Self::Error> {
        let sys = System::new_all();
        let own = std::process::id();
        let mut pids: Vec<u32> = sys
            .processes()
            .iter()
            .filter(|(_, p)| p.thread_kind().is_none() && is_match(p, name))
            .map(|(pid, _)| pid.as_u32())
            .filter(|&pid| pid != own)
            .collect();
        pids.sort_unstable();
        debug!("{} process(es) named {}: {:?}", pids.len(), name, pids);
        Ok(pids)
    }

    fn signal(&self, pid: u32, signal: Signal) -> Result<(), Self::Error> {
        let sys = System::new_all();
        let process = sys
            .process(Pid::from_u32(pid))
            .ok_or(SystemProcessError::NoSuchProcess(pid))?;
        match process.kill_with(to_sysinfo(signal)) {
            Some(true) => Ok(()),
            Some(false) => Err(SystemProcessError::SignalFailed { pid, signal }),
            None => Err(SystemProcessError::Unsupported { signal }),
        }
    }

    fn spawn_detached(&self, name: &str) -> Result<(), Self::Error> {
        // A new process group keeps the shell alive when the invoking
        // terminal goes away.
        let child = Command::new(name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|source| SystemProcessError::Spawn {
                name: name.to_string(),
                source,
            })?;
        debug!("launched {} (pid {})", name, child.id());
        Ok(())
    }
}

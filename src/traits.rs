//! The capability seam between the restart logic and the operating system.
//!
//! The [`Restarter`](crate::restart::Restarter) only talks to processes
//! through [`ProcessControl`], so tests can substitute a recording double.

use std::fmt;

/// Signal strength used when stopping a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Polite request to exit (`SIGTERM`).
    Terminate,
    /// Forced kill (`SIGKILL`).
    Kill,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Terminate => write!(f, "SIGTERM"),
            Signal::Kill => write!(f, "SIGKILL"),
        }
    }
}

/// Abstraction over listing, signalling and launching processes.
///
/// An implementation might talk to the real process table, or it might be
/// a stub used in tests.
pub trait ProcessControl {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// Return the ids of all running processes whose name matches `name`.
    fn list_matching(&self, name: &str) -> Result<Vec<u32>, Self::Error>;

    /// Send `signal` to process `pid`.
    fn signal(&self, pid: u32, signal: Signal) -> Result<(), Self::Error>;

    /// Launch `name` as a detached process with its standard streams
    /// discarded.  Returns without waiting for it.
    fn spawn_detached(&self, name: &str) -> Result<(), Self::Error>;
}

impl<T: ProcessControl + ?Sized> ProcessControl for &T {
    type Error = T::Error;

    fn list_matching(&self, name: &str) -> Result<Vec<u32>, Self::Error> {
        (**self).list_matching(name)
    }

    fn signal(&self, pid: u32, signal: Signal) -> Result<(), Self::Error> {
        (**self).signal(pid, signal)
    }

    fn spawn_detached(&self, name: &str) -> Result<(), Self::Error> {
        (**self).spawn_detached(name)
    }
}

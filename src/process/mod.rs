//! Process identity and signal delivery.
//!
//! "Who am I" and "who is my parent" are ambient OS state. They are put behind
//! [`ProcessControl`] so that an [`crate::Endpoint`] can be given fake identities
//! in tests without forking.

mod os;
pub use os::*;

mod fake;
pub use fake::*;

/// A process id.
pub type Pid = libc::pid_t;

/// A signal number. `0` delivers nothing, but still checks that the target exists.
pub type Signal = libc::c_int;

pub use libc::{SIGUSR1, SIGUSR2};

/// Resolves process identities and delivers signals.
pub trait ProcessControl: Send + Sync {
    /// The id of the calling process.
    fn current_pid(&self) -> Pid;

    /// The id of the parent of the calling process.
    fn parent_pid(&self) -> Pid;

    /// Deliver `signal` to `pid`.
    fn send_signal(&self, pid: Pid, signal: Signal) -> std::io::Result<()>;
}

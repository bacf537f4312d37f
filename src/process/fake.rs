//! A recording [`ProcessControl`] with fixed identities.

use super::{Pid, ProcessControl, Signal};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

/// A process layer that pretends to be `pid`, child of `parent_pid`.
///
/// Signals are not delivered; they are recorded, and can be inspected with
/// [`Self::signals`]. Clones share the same record.
#[derive(Clone, Debug)]
pub struct FakeProcess {
    pid: Pid,
    parent_pid: Pid,
    signals: Arc<Mutex<Vec<(Pid, Signal)>>>,
    failing: Arc<AtomicBool>,
}

impl FakeProcess {
    pub fn new(pid: Pid, parent_pid: Pid) -> Self {
        Self {
            pid,
            parent_pid,
            signals: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent delivery fail with `ESRCH`, as if the target had exited.
    pub fn fail_signals(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All signal requests so far, as `(target, signal)`, including failed ones.
    pub fn signals(&self) -> Vec<(Pid, Signal)> {
        self.signals
            .lock()
            .map(|signals| signals.clone())
            .unwrap_or_default()
    }
}

impl ProcessControl for FakeProcess {
    fn current_pid(&self) -> Pid {
        self.pid
    }

    fn parent_pid(&self) -> Pid {
        self.parent_pid
    }

    fn send_signal(&self, pid: Pid, signal: Signal) -> std::io::Result<()> {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push((pid, signal));
        }

        if self.failing.load(Ordering::SeqCst) {
            Err(std::io::Error::from_raw_os_error(libc::ESRCH))
        } else {
            Ok(())
        }
    }
}

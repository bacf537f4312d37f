//! [`ProcessControl`] backed by the operating system.

use super::{Pid, ProcessControl, Signal};

/// The real process layer, through `libc`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsProcess;

impl OsProcess {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessControl for OsProcess {
    fn current_pid(&self) -> Pid {
        // SAFETY: getpid has no preconditions and cannot fail.
        unsafe { libc::getpid() }
    }

    fn parent_pid(&self) -> Pid {
        // SAFETY: getppid has no preconditions and cannot fail.
        unsafe { libc::getppid() }
    }

    fn send_signal(&self, pid: Pid, signal: Signal) -> std::io::Result<()> {
        logger::trace!("kill({}, {})", pid, signal);

        // SAFETY: kill only reads its arguments; an invalid pid or signal is reported
        // through errno.
        if unsafe { libc::kill(pid, signal) } != 0 {
            return Err(std::io::Error::last_os_error());
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identity_matches_std() {
        let process = OsProcess::new();
        assert_eq!(process.current_pid() as u32, std::process::id());
        assert_ne!(process.parent_pid(), process.current_pid());
    }

    #[test]
    fn probe_self() {
        let process = OsProcess::new();
        process
            .send_signal(process.current_pid(), 0)
            .expect("Signal 0 to ourselves should always succeed.");
    }

    #[test]
    fn probe_missing_process() {
        let process = OsProcess::new();

        // Larger than any pid_max Linux allows.
        let err = process
            .send_signal(Pid::MAX, 0)
            .expect_err("There should be no process with this id.");
        assert_eq!(err.raw_os_error(), Some(libc::ESRCH));
    }
}

//! Defaults, and the CLI configuration of the `relay` example.
//!
use crate::process::{Pid, Signal};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Namespace of all mailbox keys in the shared store.
pub const KEY_NAMESPACE: &str = "mailslot";

/// Default pause after signalling, giving the receiver a window to be scheduled.
pub const DEFAULT_PAUSE: std::time::Duration = std::time::Duration::from_micros(100_000);

/// Default interval at which a [`crate::Listener`] polls its mailbox even without
/// being signalled, since signals of the same kind can be coalesced.
pub const DEFAULT_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(250);

/// Preferred location of the [`crate::store::FileStore`]; tmpfs on Linux.
pub const DEFAULT_STORE_DIR: &str = "/dev/shm/mailslot";

/// The directory to use for a [`crate::store::FileStore`] if none is given.
///
/// Falls back to the OS temporary directory where `/dev/shm` is unavailable.
pub fn default_store_dir() -> PathBuf {
    let shm = PathBuf::from(DEFAULT_STORE_DIR);
    match shm.parent() {
        Some(parent) if parent.is_dir() => shm,
        _ => std::env::temp_dir().join(KEY_NAMESPACE),
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CliArgs {
    /// Directory backing the shared store.
    #[clap(long)]
    pub store_dir: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a message into the mailbox of PID, then signal it.
    Send {
        #[clap(long)]
        pid: Pid,
        #[clap(short, long, default_value_t = libc::SIGUSR1)]
        signal: Signal,
        /// Persist the message without signalling.
        #[clap(long)]
        silent: bool,
        #[clap(long, default_value_t = 100)]
        pause_ms: u64,
        message: String,
    },
    /// Drain the mailbox of PID, or of this process if omitted.
    Receive {
        #[clap(long)]
        pid: Option<Pid>,
    },
    /// Wait for signals and print every message delivered to this process.
    Listen {
        #[clap(short, long, default_value_t = libc::SIGUSR1)]
        signal: Signal,
        /// Stop after this many milliseconds without a message.
        #[clap(long)]
        timeout_ms: Option<u64>,
    },
}

impl CliArgs {
    /// The store directory to use, falling back to [`default_store_dir`].
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(default_store_dir)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_send() {
        let args = CliArgs::parse_from(["relay", "send", "--pid", "100", "ping"]);
        match args.command {
            Command::Send {
                pid,
                signal,
                silent,
                pause_ms,
                message,
            } => {
                assert_eq!(pid, 100);
                assert_eq!(signal, libc::SIGUSR1);
                assert!(!silent);
                assert_eq!(pause_ms, 100);
                assert_eq!(message, "ping");
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn explicit_store_dir_wins() {
        let args = CliArgs::parse_from(["relay", "--store-dir", "/tmp/boxes", "receive"]);
        assert_eq!(args.store_dir(), PathBuf::from("/tmp/boxes"));
    }
}

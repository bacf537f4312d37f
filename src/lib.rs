//! Mailslot library.
//!
//! A message channel between a parent and a child process, made of a mailbox in a
//! shared key-value store and an OS signal announcing that the mailbox changed.
//!
//! ```no_run
//! use mailslot::{process::{OsProcess, SIGUSR1}, store::FileStore, Endpoint};
//!
//! # async fn child() -> Result<(), mailslot::MailslotError> {
//! let store = FileStore::open_default().await?;
//! let endpoint = Endpoint::current(store, OsProcess::new(), Some(SIGUSR1));
//! endpoint.send("ready").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub use config::CliArgs;

pub mod mailbox;
pub mod process;
pub mod store;

mod endpoint;
pub use endpoint::*;

mod errors;
pub use errors::MailslotError;

mod token;

/// Re-export the [`logger`] module.
pub use logger;

//! The two ends of a conversation between a parent and a child process.
//!
//! An [`Endpoint`] writes into a mailbox in the shared store, then rings the
//! doorbell: an OS signal sent to the other side. The signal carries nothing; it is
//! only a hint to go and drain the mailbox. Signals of one kind can be coalesced by
//! the OS, so a receiver must always drain everything that is pending rather than
//! expect one message per signal.

mod model;
pub use model::*;

mod notification;
pub use notification::*;

mod listen;
pub use listen::*;

//! The shared key-value store holding the mailboxes.
//!
//! Any facility offering [`SharedStore::exists`], [`SharedStore::fetch`],
//! [`SharedStore::delete`] and [`SharedStore::store`] can back a mailbox. The two
//! compound operations, [`SharedStore::update`] and [`SharedStore::take`], have
//! default implementations built from those four; they are only safe with a single
//! writer per key. Implementations which can do better override them with atomic
//! versions, as both [`MemoryStore`] and [`FileStore`] do.

mod traits;
pub use traits::*;

mod ttl;
pub use ttl::*;

mod memory;
pub use memory::*;

mod file;
pub use file::*;

//! Generation of random tokens.
//!

use rand::Rng;

/// A scratch token.
pub type ScratchToken = u64;

/// Generate a random scratch token.
pub fn generate_token() -> ScratchToken {
    rand::thread_rng().gen_range(1..u64::MAX)
}

/// Name for a scratch file belonging to `key`, unique across processes.
pub fn scratch_name(key: &str) -> String {
    format!(
        ".{key}.{pid}.{token:016x}",
        pid = std::process::id(),
        token = generate_token()
    )
}

//! How a sent message should be announced to the recipient.

use crate::process::Signal;

/// The signal to follow a message with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Notification {
    /// The default signal of the endpoint.
    #[default]
    Default,

    /// This signal, regardless of the endpoint's default.
    ///
    /// `Signal(0)` is sent as given: nothing is delivered, but a missing recipient
    /// is still reported. It does not fall back to the default signal; use
    /// [`Self::Default`] for that.
    Signal(Signal),

    /// No signal at all; the message is stored but the recipient is not woken.
    Silent,
}

impl From<Signal> for Notification {
    fn from(signal: Signal) -> Self {
        Self::Signal(signal)
    }
}

impl Notification {
    /// The signal to deliver, or [`None`] if nothing should be delivered.
    ///
    /// Without a default signal, [`Self::Default`] resolves to `0`: nothing is
    /// delivered, but the recipient is still checked for existence.
    pub fn resolve(self, default: Option<Signal>) -> Option<Signal> {
        match self {
            Self::Default => Some(default.unwrap_or(0)),
            Self::Signal(signal) => Some(signal),
            Self::Silent => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::process::{SIGUSR1, SIGUSR2};

    #[test]
    fn resolve() {
        assert_eq!(Notification::Default.resolve(Some(SIGUSR1)), Some(SIGUSR1));
        assert_eq!(Notification::Default.resolve(None), Some(0));
        assert_eq!(Notification::from(SIGUSR2).resolve(Some(SIGUSR1)), Some(SIGUSR2));
        assert_eq!(Notification::Silent.resolve(Some(SIGUSR1)), None);
        assert_eq!(Notification::Signal(0).resolve(Some(SIGUSR1)), Some(0));
    }
}

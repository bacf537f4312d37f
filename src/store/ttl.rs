//! Expiry policy of stored values.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// How long a stored value lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ttl {
    /// Never expires. Mailboxes are always stored this way.
    #[default]
    Forever,

    /// Expires once the duration has elapsed after the write.
    For(Duration),
}

impl From<Duration> for Ttl {
    /// A zero duration means forever.
    fn from(duration: Duration) -> Self {
        if duration.is_zero() {
            Self::Forever
        } else {
            Self::For(duration)
        }
    }
}

impl Ttl {
    /// The duration to live, if any.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Forever => None,
            Self::For(duration) if duration.is_zero() => None,
            Self::For(duration) => Some(*duration),
        }
    }

    /// The wall-clock expiry in milliseconds since the unix epoch, counted from `now`.
    ///
    /// `0` stands for "never".
    pub fn expires_at_millis(&self, now: SystemTime) -> u64 {
        self.duration()
            .map(|duration| {
                let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default() + duration;
                (since_epoch.as_millis() as u64).max(1)
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_forever() {
        assert_eq!(Ttl::from(Duration::ZERO), Ttl::Forever);
        assert_eq!(Ttl::For(Duration::ZERO).duration(), None);
        assert_eq!(Ttl::Forever.expires_at_millis(SystemTime::now()), 0);
    }

    #[test]
    fn expiry_is_offset_from_now() {
        let now = UNIX_EPOCH + Duration::from_secs(10);
        let ttl = Ttl::from(Duration::from_millis(1500));
        assert_eq!(ttl.expires_at_millis(now), 11_500);
    }
}

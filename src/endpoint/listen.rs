//! Waiting for messages, woken by signals.

use super::Endpoint;
use crate::{
    config::DEFAULT_POLL_INTERVAL,
    process::{ProcessControl, Signal},
    store::SharedStore,
    MailslotError,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};

/// Receives messages for an [`Endpoint`] as they are announced.
///
/// Created by [`Endpoint::listen`].
#[derive(Debug)]
pub struct Listener<'e, S, P> {
    endpoint: &'e Endpoint<S, P>,
    signals: tokio::signal::unix::Signal,
    poll_interval: Duration,
}

impl<S, P> Endpoint<S, P>
where
    S: SharedStore,
    P: ProcessControl,
{
    /// Start handling `signal`, and return a [`Listener`] woken by it.
    ///
    /// # Note
    ///
    /// This has to be called before the other side sends anything: until a handler
    /// is installed, the default action of `SIGUSR1` and `SIGUSR2` is to terminate
    /// the process. Once installed, the handler stays for the life of the process.
    pub fn listen(&self, signal_number: Signal) -> Result<Listener<'_, S, P>, MailslotError> {
        let signals = signal(SignalKind::from_raw(signal_number))?;
        logger::debug!("Listening for signal {} on {}.", signal_number, self.key());

        Ok(Listener {
            endpoint: self,
            signals,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }
}

impl<'e, S, P> Listener<'e, S, P>
where
    S: SharedStore,
    P: ProcessControl,
{
    /// Set how often the mailbox is checked without having been signalled.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Get the endpoint this listener receives for.
    pub fn endpoint(&self) -> &'e Endpoint<S, P> {
        self.endpoint
    }

    /// Wait until at least one message is pending, then drain all of them.
    ///
    /// The mailbox is checked straight away, whenever the signal arrives, and every
    /// poll interval in case a signal was coalesced with an earlier one.
    ///
    /// Without a `timeout` this waits indefinitely; with one, it fails with
    /// [`MailslotError::Timeout`] once it has elapsed with nothing received.
    pub async fn next<T>(&mut self, timeout: Option<Duration>) -> Result<Vec<T>, MailslotError>
    where
        T: DeserializeOwned,
    {
        let deadline = timeout.map(|timeout| tokio::time::Instant::now() + timeout);

        loop {
            let messages = self.endpoint.receive().await?;
            if !messages.is_empty() {
                return Ok(messages);
            }

            let expiry = async {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = self.signals.recv() => {
                    logger::trace!("Woken up by signal for {}.", self.endpoint.key());
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = expiry => {
                    let messages = self.endpoint.receive().await?;
                    return if messages.is_empty() {
                        Err(MailslotError::Timeout(timeout.unwrap_or_default()))
                    } else {
                        Ok(messages)
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        process::{FakeProcess, SIGUSR2},
        store::MemoryStore,
    };

    #[tokio::test]
    async fn pending_messages_are_returned_at_once() {
        let endpoint = Endpoint::for_peer(MemoryStore::new(), FakeProcess::new(1, 0), 100, None)
            .with_pause(Duration::ZERO);
        endpoint.send("early").await.unwrap();

        let mut listener = endpoint.listen(SIGUSR2).unwrap();
        let messages: Vec<String> = listener.next(Some(Duration::from_secs(1))).await.unwrap();
        assert_eq!(messages, vec!["early"]);
    }

    #[tokio::test]
    async fn times_out() {
        let endpoint = Endpoint::for_peer(MemoryStore::new(), FakeProcess::new(1, 0), 100, None);
        let mut listener = endpoint
            .listen(SIGUSR2)
            .unwrap()
            .with_poll_interval(Duration::from_millis(10));

        let timeout = Duration::from_millis(50);
        let start = tokio::time::Instant::now();
        let result = listener.next::<String>(Some(timeout)).await;

        assert!(matches!(result, Err(MailslotError::Timeout(t)) if t == timeout));
        assert!(start.elapsed() >= timeout);
    }

    #[tokio::test]
    async fn polling_picks_up_unsignalled_messages() {
        let store = MemoryStore::new();
        let receiver = Endpoint::for_peer(store.clone(), FakeProcess::new(1, 0), 100, None);
        let sender = Endpoint::for_peer(store, FakeProcess::new(2, 0), 100, None);

        let mut listener = receiver
            .listen(SIGUSR2)
            .unwrap()
            .with_poll_interval(Duration::from_millis(10));

        let (received, sent) = tokio::join!(
            listener.next::<u32>(Some(Duration::from_secs(2))),
            async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                sender
                    .send_with(&7u32, crate::Notification::Silent, Duration::ZERO)
                    .await
            }
        );

        sent.unwrap();
        assert_eq!(received.unwrap(), vec![7]);
    }
}

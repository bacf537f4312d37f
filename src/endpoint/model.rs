//! The endpoint: construction, sending, signalling and receiving.

use super::Notification;
use crate::{
    config::DEFAULT_PAUSE,
    mailbox::{mailbox_key, Mailbox},
    process::{Pid, ProcessControl, Signal},
    store::SharedStore,
    MailslotError,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// One side of a parent/child conversation.
///
/// An endpoint built with [`Self::current`] stands for the calling process: it
/// owns the mailbox of its own pid and signals its parent. One built with
/// [`Self::for_peer`] stands for a known child: it owns the mailbox of that child
/// and signals the child directly. Either way, both sides of one conversation
/// end up on the same mailbox.
///
/// Only one writer per mailbox is assumed unless the store provides an atomic
/// [`SharedStore::update`], as both bundled stores do.
#[derive(Debug)]
pub struct Endpoint<S, P> {
    store: S,
    process: P,
    owner_pid: Pid,
    parent_pid: Option<Pid>,
    default_signal: Option<Signal>,
    key: String,
    pause: Duration,
}

impl<S, P> Endpoint<S, P>
where
    S: SharedStore,
    P: ProcessControl,
{
    /// Create an endpoint for `pid`, or for the calling process if [`None`].
    pub fn new(store: S, process: P, pid: Option<Pid>, signal: Option<Signal>) -> Self {
        let (owner_pid, parent_pid) = match pid {
            Some(pid) => (pid, None),
            None => (process.current_pid(), Some(process.parent_pid())),
        };

        logger::debug!(
            "Endpoint for PID {} (parent {:?}) on mailbox {}.",
            owner_pid,
            parent_pid,
            mailbox_key(owner_pid)
        );

        Self {
            store,
            process,
            owner_pid,
            parent_pid,
            default_signal: signal,
            key: mailbox_key(owner_pid),
            pause: DEFAULT_PAUSE,
        }
    }

    /// Create the endpoint of the calling process, talking to its parent.
    pub fn current(store: S, process: P, signal: Option<Signal>) -> Self {
        Self::new(store, process, None, signal)
    }

    /// Create an endpoint talking to the process `pid`, typically a child.
    pub fn for_peer(store: S, process: P, pid: Pid, signal: Option<Signal>) -> Self {
        Self::new(store, process, Some(pid), signal)
    }

    /// Set the pause observed by [`Self::send`] after signalling.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Get the process id owning the mailbox.
    pub fn owner_pid(&self) -> Pid {
        self.owner_pid
    }

    /// Get the parent process id, if this endpoint stands for the calling process.
    pub fn parent_pid(&self) -> Option<Pid> {
        self.parent_pid
    }

    /// Get the signal sent when none is specified.
    pub fn default_signal(&self) -> Option<Signal> {
        self.default_signal
    }

    /// Get the key of the mailbox in the shared store.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the pause observed by [`Self::send`] after signalling.
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// The process that signals are delivered to.
    pub fn target_pid(&self) -> Pid {
        self.parent_pid.unwrap_or(self.owner_pid)
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn mailbox(&self) -> Mailbox<'_, S> {
        Mailbox::new(&self.store, self.owner_pid)
    }

    /// Send a message, followed by the default signal and the default pause.
    pub async fn send<T>(&self, message: &T) -> Result<(), MailslotError>
    where
        T: Serialize + ?Sized,
    {
        self.send_with(message, Notification::Default, self.pause).await
    }

    /// Send a message, then signal the other side as `notification` says, then
    /// sleep for `pause`.
    ///
    /// The message is fully written before any signal is sent, so a woken
    /// receiver always finds it.
    ///
    /// # Errors
    ///
    /// - [`MailslotError::Persistence`] if the message could not be stored. The
    ///   message is lost, and no signal is sent.
    /// - [`MailslotError::Notification`] if the signal could not be delivered. The
    ///   message is stored nonetheless, and no pause takes place.
    pub async fn send_with<T>(
        &self,
        message: &T,
        notification: Notification,
        pause: Duration,
    ) -> Result<(), MailslotError>
    where
        T: Serialize + ?Sized,
    {
        self.mailbox().push(message).await.map_err(|err| {
            MailslotError::Persistence(self.owner_pid, self.key.clone(), err.to_string())
        })?;

        let Some(signal) = notification.resolve(self.default_signal) else {
            logger::trace!("Message stored in {} without notification.", self.key);
            return Ok(());
        };

        self.signal(signal)
            .map_err(|err| MailslotError::Notification(self.target_pid(), signal, err))?;

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        Ok(())
    }

    /// Deliver `signal` to the other side: the parent if this endpoint stands for
    /// the calling process, the owner of the mailbox otherwise.
    pub fn signal(&self, signal: Signal) -> std::io::Result<()> {
        let target = self.target_pid();
        logger::debug!("Signalling PID {} with {}.", target, signal);

        self.process.send_signal(target, signal)
    }

    /// Remove and return every pending message in the mailbox, oldest first.
    ///
    /// Never blocks on the other side: an empty mailbox gives an empty [`Vec`].
    /// Messages which do not decode as `T` stay in the mailbox, and
    /// [`MailslotError::CorruptMailbox`] is returned.
    pub async fn receive<T>(&self) -> Result<Vec<T>, MailslotError>
    where
        T: DeserializeOwned,
    {
        self.mailbox().drain().await
    }
}

//! Send, receive and listen for messages from the command line.
//!
//! This is a simple example to demonstrate how to use the [`mailslot`] library
//! between unrelated processes sharing a [`FileStore`] directory:
//!
//! ```text
//! $ relay listen            # prints its pid, e.g. 4242
//! $ relay send --pid 4242 "hello"
//! ```

use clap::Parser;
use std::time::Duration;

use mailslot::{
    config::Command,
    process::OsProcess,
    store::FileStore,
    CliArgs, Endpoint, MailslotError, Notification,
};

#[tokio::main]
async fn main() -> Result<(), MailslotError> {
    let args = CliArgs::parse();
    let store = FileStore::open(args.store_dir()).await?;

    match args.command {
        Command::Send {
            pid,
            signal,
            silent,
            pause_ms,
            message,
        } => {
            let endpoint = Endpoint::for_peer(store, OsProcess::new(), pid, Some(signal));
            let notification = if silent {
                Notification::Silent
            } else {
                Notification::Default
            };

            endpoint
                .send_with(&message, notification, Duration::from_millis(pause_ms))
                .await?;
            println!("Sent to {}.", endpoint.key());
        }
        Command::Receive { pid } => {
            let endpoint = Endpoint::new(store, OsProcess::new(), pid, None);

            for message in endpoint.receive::<String>().await? {
                println!("{message}");
            }
        }
        Command::Listen { signal, timeout_ms } => {
            let endpoint = Endpoint::current(store, OsProcess::new(), None);
            let mut listener = endpoint.listen(signal)?;
            let timeout = timeout_ms.map(Duration::from_millis);

            println!(
                "Listening on {} as PID {}; send signal {} to wake.",
                endpoint.key(),
                endpoint.owner_pid(),
                signal
            );

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        println!("SIGINT received, gracefully shutting down.");
                        return Ok(());
                    },
                    received = listener.next::<String>(timeout) => {
                        match received {
                            Ok(messages) => {
                                messages.iter().for_each(|message| println!("{message}"))
                            }
                            Err(MailslotError::Timeout(_)) => {
                                println!("No messages, terminating.");
                                return Ok(());
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

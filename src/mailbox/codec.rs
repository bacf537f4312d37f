//! Encoding of the contents of a mailbox.
//!
//! A mailbox holds a JSON array of the messages, oldest first.

use crate::MailslotError;
use serde::de::DeserializeOwned;

/// Append `message` to the encoded mailbox `existing`, which may be absent.
pub(crate) fn append(
    key: &str,
    existing: Option<Vec<u8>>,
    message: serde_json::Value,
) -> Result<Vec<u8>, MailslotError> {
    let mut messages: Vec<serde_json::Value> = match existing {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map_err(|err| MailslotError::CorruptMailbox(key.to_owned(), err.to_string()))?,
        None => Vec::with_capacity(1),
    };

    messages.push(message);
    Ok(serde_json::to_vec(&messages)?)
}

/// Decode the messages of a mailbox.
pub(crate) fn decode<T>(key: &str, bytes: &[u8]) -> Result<Vec<T>, MailslotError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes)
        .map_err(|err| MailslotError::CorruptMailbox(key.to_owned(), err.to_string()))
}

/// Put drained contents `restored` back in front of whatever was pushed since.
///
/// Contents which are not a list at all can never be delivered; they give way to
/// anything newer.
pub(crate) fn restore(
    restored: Vec<u8>,
    existing: Option<Vec<u8>>,
) -> Result<Vec<u8>, MailslotError> {
    let Some(existing) = existing else {
        return Ok(restored);
    };

    let newer: Vec<serde_json::Value> = match serde_json::from_slice(&existing) {
        Ok(newer) => newer,
        Err(_) => return Ok(restored),
    };
    let mut messages: Vec<serde_json::Value> = match serde_json::from_slice(&restored) {
        Ok(older) => older,
        Err(_) => return Ok(existing),
    };

    logger::trace!("Restoring {} messages ahead of {}.", messages.len(), newer.len());
    messages.extend(newer);
    Ok(serde_json::to_vec(&messages)?)
}

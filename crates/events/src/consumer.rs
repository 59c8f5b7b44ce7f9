//! Sequential typed consume loop.

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::StreamError;
use crate::source::MessageSource;

/// Decodes JSON payloads of type `T` from a [`MessageSource`] and hands them
/// to a handler one at a time, preserving source order.
pub struct TopicConsumer<S, T> {
    source: S,
    _payload: PhantomData<fn() -> T>,
}

impl<S, T> TopicConsumer<S, T>
where
    S: MessageSource,
    T: DeserializeOwned,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            _payload: PhantomData,
        }
    }

    /// Run until cancelled or until the source fails.
    ///
    /// - Undecodable payloads are logged and dropped.
    /// - Handler errors are logged; the loop moves on to the next message.
    /// - A read error ends the loop with that error, unless `cancel` was
    ///   triggered, in which case the loop returns `Ok(())`.
    ///
    /// A handler that is already running is awaited to completion; the
    /// cancellation check happens between messages.
    pub async fn consume<F, Fut, E>(
        &mut self,
        cancel: &CancellationToken,
        mut handler: F,
    ) -> Result<(), StreamError>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        loop {
            let payload = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Consumer cancelled, stopping");
                    return Ok(());
                }
                result = self.source.next_payload() => match result {
                    Ok(payload) => payload,
                    Err(_) if cancel.is_cancelled() => return Ok(()),
                    Err(e) => {
                        tracing::error!(error = %e, "Stream read failed");
                        return Err(e);
                    }
                },
            };

            let message: T = match serde_json::from_slice(&payload) {
                Ok(message) => message,
                Err(e) => {
                    tracing::error!(error = %e, bytes = payload.len(), "Dropping undecodable message");
                    continue;
                }
            };

            if let Err(e) = handler(message).await {
                tracing::error!(error = %e, "Message handler failed");
            }
        }
    }
}

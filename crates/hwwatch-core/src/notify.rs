use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::PollError;

/// Outbound chat transport. Implementations live in `hwwatch-channels`.
#[async_trait]
pub trait ChatSink: Send + Sync {
    fn channel_type(&self) -> &str;
    async fn send_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Failure signatures that were already recorded. Only ever grows.
#[derive(Debug, Default, Clone)]
pub struct SentErrorLog {
    seen: HashSet<String>,
}

impl SentErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.seen.contains(signature)
    }

    /// Returns `true` when the signature was not present before.
    pub fn record(&mut self, signature: impl Into<String>) -> bool {
        self.seen.insert(signature.into())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

pub struct Notifier<S> {
    sink: S,
}

impl<S: ChatSink> Notifier<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn notify(&self, text: &str, sent_errors: &mut SentErrorLog) -> Result<(), PollError> {
        match self.sink.send_text(text).await {
            Ok(()) => {
                tracing::info!(channel = self.sink.channel_type(), "message sent");
                Ok(())
            }
            Err(err) => {
                let err = PollError::Send {
                    cause: err.to_string(),
                };
                sent_errors.record(err.to_string());
                Err(err)
            }
        }
    }
}

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use crate::api::HomeworkSource;
use crate::config::Settings;
use crate::error::PollError;
use crate::notify::{ChatSink, Notifier, SentErrorLog};
use crate::status::parse_status;
use crate::validate::check_response;

const FAILURE_PREFIX: &str = "Program failure";

/// How the `from_date` cursor moves between cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorPolicy {
    /// Computed once at startup, every cycle re-reads the same window.
    #[default]
    Fixed,
    /// Moved to the server's `current_date` (or the fetch time) after each
    /// successful cycle.
    Advance,
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub poll_interval: Duration,
    /// Extra delay taken after an error notification was delivered.
    pub error_backoff: Duration,
    pub cursor_policy: CursorPolicy,
}

impl From<&Settings> for PollConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            poll_interval: settings.poll_interval,
            error_backoff: settings.error_backoff,
            cursor_policy: settings.cursor_policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The API reported no homework in the window.
    Unchanged,
    /// Status text matched the last sent message.
    Duplicate,
    Notified(String),
    Failed { error: PollError, reported: bool },
}

pub struct PollLoop<A, S> {
    source: A,
    notifier: Notifier<S>,
    config: PollConfig,
    cursor: i64,
    last_message: String,
    sent_errors: SentErrorLog,
}

impl<A: HomeworkSource, S: ChatSink> PollLoop<A, S> {
    pub fn new(source: A, sink: S, config: PollConfig) -> Self {
        let cursor = Utc::now().timestamp() - config.poll_interval.as_secs() as i64;
        Self {
            source,
            notifier: Notifier::new(sink),
            config,
            cursor,
            last_message: String::new(),
            sent_errors: SentErrorLog::new(),
        }
    }

    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn sent_errors(&self) -> &SentErrorLog {
        &self.sent_errors
    }

    pub fn sink(&self) -> &S {
        self.notifier.sink()
    }

    /// Polls forever. Only process termination stops it.
    pub async fn run(&mut self) {
        tracing::info!(
            interval_secs = self.config.poll_interval.as_secs(),
            cursor = self.cursor,
            policy = ?self.config.cursor_policy,
            "homework polling started"
        );
        loop {
            self.tick().await;
        }
    }

    /// One cycle followed by its sleeps.
    pub async fn tick(&mut self) -> CycleOutcome {
        let outcome = self.run_once().await;
        if matches!(outcome, CycleOutcome::Failed { reported: true, .. }) {
            tokio::time::sleep(self.config.error_backoff).await;
        }
        tokio::time::sleep(self.config.poll_interval).await;
        outcome
    }

    /// One cycle without sleeping. Every failure is handled here.
    pub async fn run_once(&mut self) -> CycleOutcome {
        match self.cycle().await {
            Ok(outcome) => outcome,
            Err(error) => self.handle_failure(error).await,
        }
    }

    async fn cycle(&mut self) -> Result<CycleOutcome, PollError> {
        let fetched_at = Utc::now().timestamp();
        let response = self.source.fetch(self.cursor).await?;
        let homeworks = check_response(&response)?;

        let outcome = match homeworks.first() {
            None => {
                tracing::debug!("homework status unchanged");
                CycleOutcome::Unchanged
            }
            Some(record) => {
                let text = parse_status(record)?;
                if text == self.last_message {
                    tracing::debug!("status message already sent, skipping");
                    CycleOutcome::Duplicate
                } else {
                    self.notifier.notify(&text, &mut self.sent_errors).await?;
                    self.last_message = text.clone();
                    CycleOutcome::Notified(text)
                }
            }
        };

        if self.config.cursor_policy == CursorPolicy::Advance {
            self.cursor = next_cursor(&response, fetched_at);
        }
        Ok(outcome)
    }

    async fn handle_failure(&mut self, error: PollError) -> CycleOutcome {
        let message = format!("{FAILURE_PREFIX}: {error}");
        tracing::error!("{message}");

        if self.sent_errors.contains(&error.to_string()) || message == self.last_message {
            return CycleOutcome::Failed {
                error,
                reported: false,
            };
        }

        match self.notifier.notify(&message, &mut self.sent_errors).await {
            Ok(()) => {
                self.last_message = message;
                CycleOutcome::Failed {
                    error,
                    reported: true,
                }
            }
            Err(send_err) => {
                tracing::error!("could not report failure to chat: {send_err}");
                CycleOutcome::Failed {
                    error,
                    reported: false,
                }
            }
        }
    }
}

fn next_cursor(response: &Value, fetched_at: i64) -> i64 {
    response
        .get("current_date")
        .and_then(Value::as_i64)
        .unwrap_or(fetched_at)
}

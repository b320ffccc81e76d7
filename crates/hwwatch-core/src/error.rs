use thiserror::Error;

/// Everything that can go wrong inside a single poll cycle.
///
/// The `Display` text doubles as the dedup signature, so two failures with the
/// same cause render identically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("cannot connect to the homework API -> {cause}")]
    Connection { cause: String },

    #[error("homework API answered with status {status} != 200")]
    HttpStatus { status: u16 },

    #[error("homework API response is not valid JSON")]
    Decode,

    #[error("unexpected data type in API response (expected {expected})")]
    TypeMismatch { expected: &'static str },

    #[error("homework API returned an empty mapping")]
    EmptyResponse,

    #[error("API response has no homework {0}")]
    MissingField(&'static str),

    #[error("API response contains unknown homework status: {status}")]
    UnknownStatus { status: String },

    #[error("failed to send message -> {cause}")]
    Send { cause: String },
}

impl PollError {
    pub fn is_send(&self) -> bool {
        matches!(self, Self::Send { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    Missing { name: &'static str, all: Vec<&'static str> },

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_embeds_code() {
        let err = PollError::HttpStatus { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn identical_causes_render_identically() {
        let a = PollError::Connection {
            cause: "connection refused".into(),
        };
        let b = PollError::Connection {
            cause: "connection refused".into(),
        };
        assert_eq!(a.to_string(), b.to_string());
        assert!(!a.is_send());
    }
}

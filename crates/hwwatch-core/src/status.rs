use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PollError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Approved => "work reviewed: the reviewer liked everything! 🎉",
            Self::Reviewing => "work has been taken up for review.",
            Self::Rejected => "work reviewed: the reviewer has comments.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(PollError::UnknownStatus {
                status: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the chat text for one homework record.
pub fn parse_status(record: &Value) -> Result<String, PollError> {
    let name = record
        .get("homework_name")
        .ok_or(PollError::MissingField("name"))?;
    let status = record.get("status").ok_or(PollError::MissingField("status"))?;

    let status: HomeworkStatus = match status {
        Value::String(code) => code.parse()?,
        other => {
            return Err(PollError::UnknownStatus {
                status: other.to_string(),
            })
        }
    };

    let name = match name {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };
    Ok(format!(
        "Review status changed for \"{name}\": {}",
        status.verdict()
    ))
}

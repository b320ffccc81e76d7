use serde_json::Value;

use crate::error::PollError;

pub const HOMEWORKS_KEY: &str = "homeworks";

/// Checks the decoded payload shape and hands back the homework list.
///
/// An empty list is a normal answer meaning nothing changed in the window.
pub fn check_response(response: &Value) -> Result<&[Value], PollError> {
    let Some(map) = response.as_object() else {
        return Err(PollError::TypeMismatch {
            expected: "a mapping",
        });
    };
    if map.is_empty() {
        return Err(PollError::EmptyResponse);
    }
    match map.get(HOMEWORKS_KEY) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        _ => Err(PollError::TypeMismatch { expected: "a list" }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn returns_list_unmodified() {
        let response = json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}, {"x": 1}],
            "current_date": 1_700_000_000
        });
        let homeworks = check_response(&response).unwrap();
        assert_eq!(homeworks.len(), 2);
        assert_eq!(homeworks[1], json!({"x": 1}));
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let response = json!({"homeworks": []});
        assert!(check_response(&response).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_mapping() {
        for response in [json!([]), json!("text"), json!(null), json!(7)] {
            assert_eq!(
                check_response(&response).unwrap_err(),
                PollError::TypeMismatch {
                    expected: "a mapping"
                }
            );
        }
    }

    #[test]
    fn rejects_empty_mapping() {
        assert_eq!(
            check_response(&json!({})).unwrap_err(),
            PollError::EmptyResponse
        );
    }

    #[test]
    fn rejects_non_list_homeworks() {
        for response in [
            json!({"homeworks": null}),
            json!({"homeworks": {"homework_name": "hw1"}}),
            json!({"homeworks": "hw1"}),
            json!({"current_date": 0}),
        ] {
            assert_eq!(
                check_response(&response).unwrap_err(),
                PollError::TypeMismatch { expected: "a list" }
            );
        }
    }
}

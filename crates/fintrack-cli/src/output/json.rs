use std::io;

use fintrack_client::{ClientError, FailureEnvelope, SuccessEnvelope};
use serde::Serialize;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&FailureEnvelope::from(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use fintrack_client::views::FieldIssue;
    use fintrack_client::{ClientError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    #[test]
    fn success_json_keeps_the_envelope() {
        let payload = SuccessEnvelope {
            ok: true,
            command: "budgets list".to_string(),
            version: "0.1.0".to_string(),
            data: json!({"budgets": []}),
        };

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(true));
                assert_eq!(value["command"], "budgets list");
                assert!(value["data"]["budgets"].is_array());
            }
        }
    }

    #[test]
    fn form_errors_carry_their_issues() {
        let error = ClientError::form_validation_failed(
            "goals add",
            vec![FieldIssue::new("title", "Title is required.")],
        );
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(false));
                assert_eq!(value["error"]["code"], "form_validation_failed");
                assert_eq!(value["error"]["internal"], Value::Bool(false));
                assert_eq!(value["data"]["issues"][0]["field"], "title");
            }
        }
    }
}

use fintrack_client::ClientError;
use serde_json::Value;

use super::format::{field_text, rows_of};

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    let issues = error
        .data
        .as_ref()
        .map(|data| rows_of(data, "issues"))
        .unwrap_or_default();
    if !issues.is_empty() {
        lines.push(String::new());
        lines.push("Fields:".to_string());
        lines.extend(issues.iter().map(render_issue));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

fn render_issue(issue: &Value) -> String {
    format!(
        "  - {}: {}",
        field_text(issue, "field"),
        field_text(issue, "message")
    )
}

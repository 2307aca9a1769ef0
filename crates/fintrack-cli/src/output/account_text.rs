use serde_json::Value;

use super::format::{field_text, key_value_rows};

pub fn render_session_change(data: &Value) -> String {
    let session = &data["session"];
    let mut lines = vec![field_text(data, "message"), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Name:", field_text(session, "name")),
            ("Email:", field_text(session, "email")),
            ("Backend:", field_text(data, "backend")),
        ],
        2,
    ));
    lines.join("\n")
}

pub fn render_status(data: &Value) -> String {
    if data["authenticated"].as_bool() != Some(true) {
        return [
            "Not signed in.".to_string(),
            String::new(),
            "Run `fintrack auth login` or `fintrack auth signup`.".to_string(),
        ]
        .join("\n");
    }

    let session = &data["session"];
    let mut lines = vec![format!("Signed in as {}.", field_text(session, "email"))];
    lines.push(String::new());
    lines.extend(key_value_rows(
        &[
            ("User id:", field_text(session, "id")),
            ("Name:", field_text(session, "name")),
            ("Backend:", field_text(data, "backend")),
        ],
        2,
    ));
    lines.join("\n")
}

pub fn render_message(data: &Value) -> String {
    field_text(data, "message")
}

pub fn render_navigation(data: &Value) -> String {
    let requested = field_text(data, "requested");
    let path = field_text(data, "path");
    if data["allowed"].as_bool() == Some(true) {
        format!("`{requested}` opens {path}.")
    } else {
        format!("`{requested}` redirects to {path}.")
    }
}

pub fn render_profile(data: &Value) -> String {
    let profile = &data["profile"];
    let mut lines = vec!["Profile".to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("User id:", field_text(profile, "user_id")),
            ("Name:", field_text(profile, "name")),
            ("Email:", field_text(profile, "email")),
            ("Member since:", field_text(profile, "member_since")),
            ("Backend:", field_text(data, "backend")),
        ],
        2,
    ));
    lines.join("\n")
}

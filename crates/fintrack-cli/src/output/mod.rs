mod account_text;
mod dashboard_text;
mod error_text;
mod format;
mod json;
mod mode;
mod records_text;

use std::io;

use fintrack_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_args};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    let data = &success.data;
    let body = match success.command.as_str() {
        "auth signup" | "auth login" | "profile update" => {
            account_text::render_session_change(data)
        }
        "auth status" => account_text::render_status(data),
        "auth logout" | "profile password" | "profile delete" => account_text::render_message(data),
        "open" => account_text::render_navigation(data),
        "profile show" => account_text::render_profile(data),
        "dashboard" => dashboard_text::render_dashboard(data),
        "transactions list" => records_text::render_transaction_list(data),
        "transactions add" | "transactions edit" => records_text::render_transaction_saved(data),
        "budgets list" => records_text::render_budget_list(data),
        "budgets add" | "budgets edit" | "budgets spent" => records_text::render_budget_saved(data),
        "goals list" => records_text::render_goal_list(data),
        "goals add" | "goals edit" | "goals contribute" => records_text::render_goal_saved(data),
        "transactions delete" | "budgets delete" | "goals delete" => {
            records_text::render_delete(data)
        }
        _ => {
            return Err(io::Error::other(format!(
                "unsupported text output command `{}`",
                success.command
            )));
        }
    };
    Ok(body)
}

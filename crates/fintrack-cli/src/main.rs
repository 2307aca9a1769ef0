mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use fintrack_client::ClientError;
use stdout_io::write_stdout_text;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "FINTRACK_LOG";

const ROOT_HELP: &str = "fintrack - personal finance tracker

Usage:
  fintrack <command>

Start here:
  fintrack auth signup --name <name> --email <email> --password <pw> --confirm-password <pw>
  fintrack dashboard
  fintrack --help
";

const TOP_LEVEL_HELP: &str = "fintrack - personal finance tracker

USAGE: fintrack <command> [--json] [--home <dir>] [--backend local|tables]

Get started:
  fintrack auth signup --name Ana --email ana@example.com --password <pw> --confirm-password <pw>
  fintrack auth login --email ana@example.com --password <pw>
  fintrack auth status                          Show who is signed in
  fintrack auth logout

Track money:
  fintrack dashboard                            Totals, recent activity and charts
  fintrack transactions list|add|edit|delete    Income and expenses
  fintrack budgets list|add|edit|spent|delete   Spending limits per category
  fintrack goals list|add|edit|contribute|delete
                                                Savings goals

Account:
  fintrack profile show|update|password|delete

Navigation:
  fintrack open <route>                         Where a route leads for this session

Deletes only happen with `--confirm`.
Run `fintrack <command> --help` for command usage.
";

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let text = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout_text(&text).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_args(&cli.global);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so our "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Builds the subcommand path from raw CLI args for use in help hints,
/// e.g. "budgets add" or "auth".
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let mut words = raw_args
        .iter()
        .skip(1)
        .map(String::as_str)
        .filter(|value| !value.starts_with('-'));
    let group = words.next()?;
    let action = words.next();

    match (group, action) {
        ("auth", Some(action @ ("signup" | "login" | "logout" | "status")))
        | ("transactions", Some(action @ ("list" | "add" | "edit" | "delete")))
        | ("budgets", Some(action @ ("list" | "add" | "edit" | "spent" | "delete")))
        | ("goals", Some(action @ ("list" | "add" | "edit" | "contribute" | "delete")))
        | ("profile", Some(action @ ("show" | "update" | "password" | "delete"))) => {
            Some(format!("{group} {action}"))
        }
        ("auth" | "transactions" | "budgets" | "goals" | "profile" | "dashboard" | "open", _) => {
            Some(group.to_string())
        }
        _ => None,
    }
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

#[cfg(test)]
mod tests {
    use super::{command_path_from_args, strip_clap_boilerplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_hints_follow_known_paths() {
        assert_eq!(
            command_path_from_args(&args(&["fintrack", "budgets", "add", "--limit", "x"])),
            Some("budgets add".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["fintrack", "goals", "--json", "bogus"])),
            Some("goals".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["fintrack", "nonsense"])),
            None
        );
    }

    #[test]
    fn clap_boilerplate_is_removed() {
        let message = "error: invalid value\n\nUsage: fintrack budgets add\n";
        assert_eq!(strip_clap_boilerplate(message), "error: invalid value");
    }
}

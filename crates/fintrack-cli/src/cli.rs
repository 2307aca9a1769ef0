use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fintrack_client::config::Backend;
use fintrack_client::models::{BudgetPeriod, TransactionKind};
use fintrack_client::views::KindFilter;
use rust_decimal::Decimal;

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "date must use valid calendar values".to_string())
}

pub fn parse_amount(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value.trim())
        .map_err(|_| "amount must be a plain number like 12.50".to_string())
}

pub fn parse_backend(value: &str) -> Result<Backend, String> {
    Backend::parse(value).map_err(|error| error.message)
}

pub fn parse_kind(value: &str) -> Result<TransactionKind, String> {
    TransactionKind::parse(value).ok_or_else(|| "type must be one of: income, expense".to_string())
}

pub fn parse_filter(value: &str) -> Result<KindFilter, String> {
    KindFilter::parse(value)
        .ok_or_else(|| "filter must be one of: all, income, expense".to_string())
}

pub fn parse_period(value: &str) -> Result<BudgetPeriod, String> {
    BudgetPeriod::parse(value).ok_or_else(|| "period must be one of: monthly, weekly".to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "fintrack",
    version,
    about = "personal finance tracker",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Directory holding the data store (defaults to ~/.fintrack)
    #[arg(long, global = true, env = "FINTRACK_HOME")]
    pub home: Option<PathBuf>,
    /// Persistence flavor: local or tables
    #[arg(long, global = true, env = "FINTRACK_BACKEND", value_parser = parse_backend)]
    pub backend: Option<Backend>,
    /// Emit the JSON envelope instead of text
    #[arg(long, global = true)]
    pub json: bool,
    /// Pin "today" for date defaults and charts (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_iso_date)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account, sign in and out
    #[command(arg_required_else_help = true)]
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Show totals, recent activity and income/expense charts
    Dashboard,
    /// Record income and expenses
    #[command(arg_required_else_help = true)]
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommand,
    },
    /// Set spending limits per category
    #[command(arg_required_else_help = true)]
    Budgets {
        #[command(subcommand)]
        command: BudgetsCommand,
    },
    /// Track savings goals
    #[command(arg_required_else_help = true)]
    Goals {
        #[command(subcommand)]
        command: GoalsCommand,
    },
    /// View and edit the signed-in account
    #[command(arg_required_else_help = true)]
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Resolve where a route leads for the current session
    Open {
        /// Route path such as /dashboard or goals
        #[arg(default_value = "/")]
        route: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AuthCommand {
    /// Create an account and sign in
    Signup {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        confirm_password: String,
    },
    /// Sign in with email and password
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show who is signed in
    Status,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TransactionsCommand {
    /// List transactions, newest first
    List {
        /// all, income or expense
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        filter: KindFilter,
        /// Case-insensitive match on description or category
        #[arg(long)]
        search: Option<String>,
    },
    /// Record a transaction
    Add {
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_amount)]
        amount: Option<Decimal>,
        /// income or expense
        #[arg(long = "type", default_value = "expense", value_parser = parse_kind)]
        kind: TransactionKind,
        #[arg(long, default_value = "")]
        category: String,
        /// Defaults to today
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<NaiveDate>,
    },
    /// Change fields of a transaction; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_amount)]
        amount: Option<Decimal>,
        #[arg(long = "type", value_parser = parse_kind)]
        kind: Option<TransactionKind>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<NaiveDate>,
    },
    /// Delete a transaction
    Delete {
        id: i64,
        /// Required to actually delete
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum BudgetsCommand {
    /// List budgets with progress
    List,
    /// Create a budget for an unused category
    Add {
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, value_parser = parse_amount)]
        limit: Option<Decimal>,
        /// monthly or weekly
        #[arg(long, default_value = "monthly", value_parser = parse_period)]
        period: BudgetPeriod,
    },
    /// Change category, limit or period; spending is kept
    Edit {
        id: i64,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = parse_amount)]
        limit: Option<Decimal>,
        #[arg(long, value_parser = parse_period)]
        period: Option<BudgetPeriod>,
    },
    /// Set the amount spent against a budget
    Spent {
        id: i64,
        #[arg(long, value_parser = parse_amount)]
        amount: Option<Decimal>,
    },
    /// Delete a budget
    Delete {
        id: i64,
        /// Required to actually delete
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum GoalsCommand {
    /// List active and completed goals
    List,
    /// Create a savings goal
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, value_parser = parse_amount)]
        target: Option<Decimal>,
        /// Amount already saved; defaults to zero
        #[arg(long, value_parser = parse_amount)]
        current: Option<Decimal>,
        #[arg(long, value_parser = parse_iso_date)]
        deadline: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Change fields of a goal; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_amount)]
        target: Option<Decimal>,
        #[arg(long, value_parser = parse_amount)]
        current: Option<Decimal>,
        #[arg(long, value_parser = parse_iso_date)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Add money to a goal
    Contribute {
        id: i64,
        #[arg(long, value_parser = parse_amount)]
        amount: Option<Decimal>,
    },
    /// Delete a goal
    Delete {
        id: i64,
        /// Required to actually delete
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommand {
    /// Show account details
    Show,
    /// Change name and email
    Update {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Change the password
    Password {
        #[arg(long, default_value = "")]
        current: String,
        #[arg(long, default_value = "")]
        new: String,
        #[arg(long, default_value = "")]
        confirm_password: String,
    },
    /// Delete the account and sign out; records are kept
    Delete {
        /// Required to actually delete
        #[arg(long)]
        confirm: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use fintrack_client::config::Backend;
    use fintrack_client::models::TransactionKind;
    use rust_decimal_macros::dec;

    use super::{Commands, TransactionsCommand, parse_from, parse_iso_date};

    #[test]
    fn parse_command_paths() {
        let cases: [Vec<&str>; 14] = [
            vec!["fintrack", "auth", "status"],
            vec!["fintrack", "auth", "login", "--email", "a@b.c", "--password", "x"],
            vec!["fintrack", "dashboard", "--json"],
            vec!["fintrack", "transactions", "list", "--filter", "income"],
            vec![
                "fintrack",
                "transactions",
                "add",
                "--description",
                "Lunch",
                "--amount",
                "12.50",
                "--type",
                "expense",
            ],
            vec!["fintrack", "transactions", "edit", "3", "--amount", "9"],
            vec!["fintrack", "transactions", "delete", "3", "--confirm"],
            vec!["fintrack", "budgets", "list"],
            vec!["fintrack", "budgets", "spent", "1", "--amount", "40"],
            vec!["fintrack", "goals", "contribute", "1", "--amount", "40"],
            vec!["fintrack", "goals", "add", "--deadline", "2027-01-01"],
            vec!["fintrack", "profile", "show"],
            vec!["fintrack", "profile", "delete", "--confirm"],
            vec!["fintrack", "open", "/goals"],
        ];

        for args in cases {
            let parsed = parse_from(args.clone());
            assert!(parsed.is_ok(), "failed to parse {args:?}");
        }
    }

    #[test]
    fn global_flags_parse_after_subcommands() {
        let parsed = parse_from([
            "fintrack",
            "transactions",
            "add",
            "--amount",
            "4.20",
            "--type",
            "income",
            "--backend",
            "tables",
            "--today",
            "2026-10-16",
            "--json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(cli.global.json);
            assert_eq!(cli.global.backend, Some(Backend::Tables));
            assert!(cli.global.today.is_some());
            assert!(matches!(
                cli.command,
                Commands::Transactions {
                    command: TransactionsCommand::Add {
                        kind: TransactionKind::Income,
                        ..
                    }
                }
            ));
            if let Commands::Transactions {
                command: TransactionsCommand::Add { amount, .. },
            } = cli.command
            {
                assert_eq!(amount, Some(dec!(4.20)));
            }
        }
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse_from(["fintrack", "transactions", "list", "--filter", "weekly"]).is_err());
        assert!(parse_from(["fintrack", "transactions", "add", "--amount", "ten"]).is_err());
        assert!(parse_from(["fintrack", "budgets", "add", "--period", "daily"]).is_err());
        assert!(parse_from(["fintrack", "dashboard", "--backend", "cloud"]).is_err());
    }

    #[test]
    fn iso_dates_must_be_strict() {
        assert!(parse_iso_date("2026-10-16").is_ok());
        assert!(parse_iso_date("2026-1-16").is_err());
        assert!(parse_iso_date("2026-02-30").is_err());
    }

    #[test]
    fn bare_group_shows_help() {
        let parsed = parse_from(["fintrack", "transactions"]);
        assert!(parsed.is_err());
        if let Err(err) = parsed {
            assert_eq!(
                err.kind(),
                ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            );
        }
    }

    #[test]
    fn help_command_is_rejected() {
        assert!(parse_from(["fintrack", "help"]).is_err());
    }
}

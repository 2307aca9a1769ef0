use fintrack_client::auth::{PasswordChange, ProfileUpdate, SignUp};
use fintrack_client::commands::budgets::BudgetEdit;
use fintrack_client::commands::goals::GoalEdit;
use fintrack_client::commands::transactions::TransactionEdit;
use fintrack_client::commands::{
    CommandOptions, auth, budgets, dashboard, goals, navigation, profile, transactions,
};
use fintrack_client::views::{BudgetDraft, GoalDraft, TransactionDraft};
use fintrack_client::{ClientResult, SuccessEnvelope};

use crate::cli::{
    AuthCommand, BudgetsCommand, Cli, Commands, GlobalArgs, GoalsCommand, ProfileCommand,
    TransactionsCommand,
};

fn command_options(global: &GlobalArgs) -> CommandOptions<'_> {
    CommandOptions {
        home_override: global.home.as_deref(),
        backend: global.backend,
        today: global.today,
    }
}

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    let options = command_options(&cli.global);
    match &cli.command {
        Commands::Auth { command } => dispatch_auth(options, command),
        Commands::Dashboard => dashboard::run(options),
        Commands::Transactions { command } => dispatch_transactions(options, command),
        Commands::Budgets { command } => dispatch_budgets(options, command),
        Commands::Goals { command } => dispatch_goals(options, command),
        Commands::Profile { command } => dispatch_profile(options, command),
        Commands::Open { route } => navigation::open(options, route),
    }
}

fn dispatch_auth(
    options: CommandOptions<'_>,
    command: &AuthCommand,
) -> ClientResult<SuccessEnvelope> {
    match command {
        AuthCommand::Signup {
            name,
            email,
            password,
            confirm_password,
        } => auth::signup(
            options,
            &SignUp {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
                confirm_password: confirm_password.clone(),
            },
        ),
        AuthCommand::Login { email, password } => auth::login(options, email, password),
        AuthCommand::Logout => auth::logout(options),
        AuthCommand::Status => auth::status(options),
    }
}

fn dispatch_transactions(
    options: CommandOptions<'_>,
    command: &TransactionsCommand,
) -> ClientResult<SuccessEnvelope> {
    match command {
        TransactionsCommand::List { filter, search } => {
            transactions::list(options, *filter, search.as_deref())
        }
        TransactionsCommand::Add {
            description,
            amount,
            kind,
            category,
            date,
        } => transactions::add(
            options,
            &TransactionDraft {
                description: description.clone(),
                amount: *amount,
                kind: *kind,
                category: category.clone(),
                occurred_on: *date,
            },
        ),
        TransactionsCommand::Edit {
            id,
            description,
            amount,
            kind,
            category,
            date,
        } => transactions::edit(
            options,
            *id,
            &TransactionEdit {
                description: description.clone(),
                amount: *amount,
                kind: *kind,
                category: category.clone(),
                occurred_on: *date,
            },
        ),
        TransactionsCommand::Delete { id, confirm } => transactions::delete(options, *id, *confirm),
    }
}

fn dispatch_budgets(
    options: CommandOptions<'_>,
    command: &BudgetsCommand,
) -> ClientResult<SuccessEnvelope> {
    match command {
        BudgetsCommand::List => budgets::list(options),
        BudgetsCommand::Add {
            category,
            limit,
            period,
        } => budgets::add(
            options,
            &BudgetDraft {
                category: category.clone(),
                limit: *limit,
                period: *period,
            },
        ),
        BudgetsCommand::Edit {
            id,
            category,
            limit,
            period,
        } => budgets::edit(
            options,
            *id,
            &BudgetEdit {
                category: category.clone(),
                limit: *limit,
                period: *period,
            },
        ),
        BudgetsCommand::Spent { id, amount } => budgets::set_spent(options, *id, *amount),
        BudgetsCommand::Delete { id, confirm } => budgets::delete(options, *id, *confirm),
    }
}

fn dispatch_goals(
    options: CommandOptions<'_>,
    command: &GoalsCommand,
) -> ClientResult<SuccessEnvelope> {
    match command {
        GoalsCommand::List => goals::list(options),
        GoalsCommand::Add {
            title,
            target,
            current,
            deadline,
            category,
        } => goals::add(
            options,
            &GoalDraft {
                title: title.clone(),
                target_amount: *target,
                current_amount: *current,
                deadline: *deadline,
                category: category.clone(),
            },
        ),
        GoalsCommand::Edit {
            id,
            title,
            target,
            current,
            deadline,
            category,
        } => goals::edit(
            options,
            *id,
            &GoalEdit {
                title: title.clone(),
                target_amount: *target,
                current_amount: *current,
                deadline: *deadline,
                category: category.clone(),
            },
        ),
        GoalsCommand::Contribute { id, amount } => goals::contribute(options, *id, *amount),
        GoalsCommand::Delete { id, confirm } => goals::delete(options, *id, *confirm),
    }
}

fn dispatch_profile(
    options: CommandOptions<'_>,
    command: &ProfileCommand,
) -> ClientResult<SuccessEnvelope> {
    match command {
        ProfileCommand::Show => profile::show(options),
        ProfileCommand::Update { name, email } => profile::update(
            options,
            &ProfileUpdate {
                name: name.clone(),
                email: email.clone(),
            },
        ),
        ProfileCommand::Password {
            current,
            new,
            confirm_password,
        } => profile::change_password(
            options,
            &PasswordChange {
                current_password: current.clone(),
                new_password: new.clone(),
                confirm_password: confirm_password.clone(),
            },
        ),
        ProfileCommand::Delete { confirm } => profile::delete(options, *confirm),
    }
}

use serde_json::Value;

use super::format::{
    Align, Column, field_text, key_value_rows, money, render_table_or_blocks, rows_of,
    terminal_width,
};

const TRANSACTION_COLUMNS: [Column<'static>; 5] = [
    Column {
        name: "ID",
        align: Align::Right,
    },
    Column {
        name: "Date",
        align: Align::Left,
    },
    Column {
        name: "Description",
        align: Align::Left,
    },
    Column {
        name: "Category",
        align: Align::Left,
    },
    Column {
        name: "Amount",
        align: Align::Right,
    },
];

fn signed_amount(transaction: &Value) -> String {
    let amount = money(&transaction["amount"]);
    if field_text(transaction, "type") == "income" {
        format!("+{amount}")
    } else {
        format!("-{amount}")
    }
}

pub(super) fn transaction_rows(transactions: &[Value]) -> Vec<String> {
    let rows = transactions
        .iter()
        .map(|transaction| {
            vec![
                field_text(transaction, "id"),
                field_text(transaction, "date"),
                field_text(transaction, "description"),
                field_text(transaction, "category"),
                signed_amount(transaction),
            ]
        })
        .collect::<Vec<_>>();
    render_table_or_blocks(&TRANSACTION_COLUMNS, &rows, terminal_width(), "Transaction")
}

pub fn render_transaction_list(data: &Value) -> String {
    let totals = &data["totals"];
    let mut lines = vec!["Transactions".to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Income:", money(&totals["income"])),
            ("Expenses:", money(&totals["expenses"])),
            ("Net:", money(&totals["net"])),
        ],
        2,
    ));
    lines.push(String::new());

    let transactions = rows_of(data, "transactions");
    if transactions.is_empty() {
        lines.push("  No transactions match.".to_string());
    } else {
        lines.extend(transaction_rows(transactions));
    }
    lines.join("\n")
}

pub fn render_transaction_saved(data: &Value) -> String {
    let transaction = &data["transaction"];
    format!(
        "Saved transaction {}: {} {} on {}.",
        field_text(transaction, "id"),
        field_text(transaction, "description"),
        signed_amount(transaction),
        field_text(transaction, "date"),
    )
}

fn budget_line(budget: &Value) -> Vec<String> {
    vec![
        field_text(budget, "id"),
        field_text(budget, "category"),
        field_text(budget, "period"),
        format!("{} / {}", money(&budget["spent"]), money(&budget["limit"])),
        format!("{}%", field_text(budget, "percentage")),
        field_text(budget, "status"),
    ]
}

pub fn render_budget_list(data: &Value) -> String {
    let totals = &data["totals"];
    let mut lines = vec!["Budgets".to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Total limit:", money(&totals["limit"])),
            ("Total spent:", money(&totals["spent"])),
            ("Used:", format!("{}%", field_text(totals, "percentage"))),
        ],
        2,
    ));
    lines.push(String::new());

    let budgets = rows_of(data, "budgets");
    if budgets.is_empty() {
        lines.push("  No budgets yet. Add one with `fintrack budgets add`.".to_string());
    } else {
        let columns = [
            Column {
                name: "ID",
                align: Align::Right,
            },
            Column {
                name: "Category",
                align: Align::Left,
            },
            Column {
                name: "Period",
                align: Align::Left,
            },
            Column {
                name: "Spent / Limit",
                align: Align::Right,
            },
            Column {
                name: "Used",
                align: Align::Right,
            },
            Column {
                name: "Status",
                align: Align::Left,
            },
        ];
        let rows = budgets.iter().map(budget_line).collect::<Vec<_>>();
        lines.extend(render_table_or_blocks(&columns, &rows, terminal_width(), "Budget"));
    }
    lines.join("\n")
}

pub fn render_budget_saved(data: &Value) -> String {
    let budget = &data["budget"];
    format!(
        "Saved budget {} for {}: {} of {} spent ({}).",
        field_text(budget, "id"),
        field_text(budget, "category"),
        money(&budget["spent"]),
        money(&budget["limit"]),
        field_text(budget, "status"),
    )
}

fn goal_line(goal: &Value) -> Vec<String> {
    vec![
        field_text(goal, "id"),
        field_text(goal, "title"),
        format!(
            "{} / {}",
            money(&goal["currentAmount"]),
            money(&goal["targetAmount"])
        ),
        field_text(goal, "deadline"),
        field_text(goal, "status"),
    ]
}

fn goal_table(goals: &[Value]) -> Vec<String> {
    let columns = [
        Column {
            name: "ID",
            align: Align::Right,
        },
        Column {
            name: "Title",
            align: Align::Left,
        },
        Column {
            name: "Saved / Target",
            align: Align::Right,
        },
        Column {
            name: "Deadline",
            align: Align::Left,
        },
        Column {
            name: "Status",
            align: Align::Left,
        },
    ];
    let rows = goals.iter().map(goal_line).collect::<Vec<_>>();
    render_table_or_blocks(&columns, &rows, terminal_width(), "Goal")
}

pub fn render_goal_list(data: &Value) -> String {
    let totals = &data["totals"];
    let mut lines = vec!["Goals".to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Saved:", money(&totals["current"])),
            ("Target:", money(&totals["target"])),
            ("Remaining:", money(&totals["remaining"])),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Active:".to_string());
    let active = rows_of(data, "active");
    if active.is_empty() {
        lines.push("  No active goals. Add one with `fintrack goals add`.".to_string());
    } else {
        lines.extend(goal_table(active));
    }

    let completed = rows_of(data, "completed");
    if !completed.is_empty() {
        lines.push(String::new());
        lines.push("Completed:".to_string());
        lines.extend(goal_table(completed));
    }
    lines.join("\n")
}

pub fn render_goal_saved(data: &Value) -> String {
    let goal = &data["goal"];
    let mut line = format!(
        "Saved goal {} \"{}\": {} of {} ({}).",
        field_text(goal, "id"),
        field_text(goal, "title"),
        money(&goal["currentAmount"]),
        money(&goal["targetAmount"]),
        field_text(goal, "status"),
    );
    if goal["completed"].as_bool() == Some(true) {
        line.push_str(" Goal reached!");
    }
    line
}

pub fn render_delete(data: &Value) -> String {
    field_text(data, "message")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_budget_list, render_goal_saved, render_transaction_list};

    #[test]
    fn transaction_list_signs_amounts_by_type() {
        let rendered = render_transaction_list(&json!({
            "totals": {"income": 3000.0, "expenses": 12.5, "net": 2987.5},
            "transactions": [
                {"id": 1, "description": "Salary", "amount": 3000.0, "type": "income",
                 "category": "Salary", "date": "2026-10-01"},
                {"id": 2, "description": "Lunch", "amount": 12.5, "type": "expense",
                 "category": "Food & Dining", "date": "2026-10-15"}
            ]
        }));
        assert!(rendered.contains("+3000.00"));
        assert!(rendered.contains("-12.50"));
        assert!(rendered.contains("Net:       2987.50"));
    }

    #[test]
    fn budget_list_shows_usage() {
        let rendered = render_budget_list(&json!({
            "totals": {"limit": 500.0, "spent": 450.0, "percentage": 90.0},
            "budgets": [
                {"id": 1, "category": "Travel", "period": "monthly", "limit": 500.0,
                 "spent": 450.0, "percentage": 90.0, "status": "warning"}
            ]
        }));
        assert!(rendered.contains("450.00 / 500.00"));
        assert!(rendered.contains("warning"));
    }

    #[test]
    fn completed_goal_is_celebrated() {
        let rendered = render_goal_saved(&json!({
            "goal": {"id": 4, "title": "Trip", "currentAmount": 1000.0,
                     "targetAmount": 1000.0, "status": "completed", "completed": true}
        }));
        assert!(rendered.ends_with("Goal reached!"));
    }
}

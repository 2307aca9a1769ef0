use serde_json::Value;

use super::format::{
    Align, Column, field_text, key_value_rows, money, render_table_or_blocks, rows_of,
    terminal_width,
};
use super::records_text::transaction_rows;

pub fn render_dashboard(data: &Value) -> String {
    let summary = &data["summary"];
    let mut lines = vec![
        format!("Dashboard for {}", field_text(&data["session"], "name")),
        String::new(),
    ];
    lines.extend(key_value_rows(
        &[
            ("Income:", money(&summary["total_income"])),
            ("Expenses:", money(&summary["total_expenses"])),
            ("Net:", money(&summary["net"])),
            ("Transactions:", field_text(summary, "count")),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Recent transactions:".to_string());
    let recent = rows_of(summary, "recent");
    if recent.is_empty() {
        lines.push("  No transactions yet. Add one with `fintrack transactions add`.".to_string());
    } else {
        lines.extend(transaction_rows(recent));
    }

    lines.push(String::new());
    lines.push("Last 7 days:".to_string());
    lines.extend(series_rows(rows_of(data, "daily")));
    lines.push(String::new());
    lines.push("Last 3 months:".to_string());
    lines.extend(series_rows(rows_of(data, "monthly")));

    lines.join("\n")
}

fn series_rows(points: &[Value]) -> Vec<String> {
    let columns = [
        Column {
            name: "Period",
            align: Align::Left,
        },
        Column {
            name: "Income",
            align: Align::Right,
        },
        Column {
            name: "Expense",
            align: Align::Right,
        },
    ];
    let rows = points
        .iter()
        .map(|point| {
            vec![
                field_text(point, "label"),
                money(&point["income"]),
                money(&point["expense"]),
            ]
        })
        .collect::<Vec<_>>();
    render_table_or_blocks(&columns, &rows, terminal_width(), "Period")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_dashboard;

    #[test]
    fn renders_totals_and_series() {
        let rendered = render_dashboard(&json!({
            "session": {"id": 1, "name": "Ana", "email": "ana@example.com"},
            "summary": {
                "total_income": 3000.0,
                "total_expenses": 23.5,
                "net": 2976.5,
                "count": 2,
                "recent": [
                    {"id": 2, "description": "Lunch", "amount": 23.5, "type": "expense",
                     "category": "Food & Dining", "date": "2026-10-15"}
                ]
            },
            "daily": [{"label": "Oct 16", "income": 0.0, "expense": 0.0}],
            "monthly": [{"label": "Oct", "income": 3000.0, "expense": 23.5}]
        }));
        assert!(rendered.contains("Dashboard for Ana"));
        assert!(rendered.contains("Net:           2976.50"));
        assert!(rendered.contains("Lunch"));
        assert!(rendered.contains("Oct 16"));
        assert!(rendered.contains("3000.00"));
    }

    #[test]
    fn empty_dashboard_points_at_add() {
        let rendered = render_dashboard(&json!({
            "session": {"name": "Ana"},
            "summary": {"total_income": 0, "total_expenses": 0, "net": 0, "count": 0, "recent": []},
            "daily": [],
            "monthly": []
        }));
        assert!(rendered.contains("fintrack transactions add"));
    }
}

use std::cmp;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;
const MIN_TABLE_COLUMN_WIDTH: usize = 8;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);
    cmp::max(from_env, 40)
}

/// Two-decimal rendering of a JSON amount, read from the number's own digits.
/// Missing values read as zero.
pub fn money(value: &Value) -> String {
    let Value::Number(number) = value else {
        return "0.00".to_string();
    };
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(|amount| format!("{:.2}", amount.round_dp(2)))
        .unwrap_or_else(|_| format!("{:.2}", number.as_f64().unwrap_or(0.0)))
}

pub fn field_text(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub fn rows_of<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }

    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let minimums = columns
        .iter()
        .map(|column| cmp::max(column.name.chars().count(), MIN_TABLE_COLUMN_WIDTH))
        .collect::<Vec<usize>>();
    let budget = max_width
        .saturating_sub(INDENT)
        .saturating_sub(COLUMN_GAP * (columns.len() - 1));
    let natural = natural_column_widths(columns, rows);
    let Some(widths) = fit_widths_to_budget(&natural, &minimums, budget) else {
        return render_blocks(columns, rows, block_label);
    };

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<_>>();
    let mut output = vec![format_row(columns, &header, &widths)];
    for row in rows {
        let wrapped = widths
            .iter()
            .enumerate()
            .map(|(index, width)| wrap_text(row.get(index).map_or("", String::as_str), *width))
            .collect::<Vec<_>>();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        for line in 0..height {
            let cells = wrapped
                .iter()
                .map(|chunks| chunks.get(line).cloned().unwrap_or_default())
                .collect::<Vec<_>>();
            output.push(format_row(columns, &cells, &widths));
        }
    }
    output
}

fn natural_column_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|value| value.chars().count())
                .fold(column.name.chars().count(), cmp::max)
        })
        .collect()
}

/// Narrows the widest shrinkable column one step at a time until the row fits.
fn fit_widths_to_budget(
    natural: &[usize],
    minimums: &[usize],
    budget: usize,
) -> Option<Vec<usize>> {
    if natural.len() != minimums.len() || minimums.iter().sum::<usize>() > budget {
        return None;
    }

    let mut widths = natural.to_vec();
    let mut total = widths.iter().sum::<usize>();
    while total > budget {
        let widest = widths
            .iter()
            .zip(minimums)
            .enumerate()
            .filter(|(_, (width, minimum))| width > minimum)
            .max_by_key(|(_, (width, _))| **width)
            .map(|(index, _)| index)?;
        widths[widest] -= 1;
        total -= 1;
    }
    Some(widths)
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .zip(widths)
        .zip(cells)
        .map(|((column, &width), value)| match column.align {
            Align::Left => format!("{value:<width$}"),
            Align::Right => format!("{value:>width$}"),
        })
        .collect::<Vec<_>>();
    format!("{}{}", " ".repeat(INDENT), pieces.join(&" ".repeat(COLUMN_GAP)))
}

fn wrap_text(value: &str, width: usize) -> Vec<String> {
    if width == 0 || value.chars().count() <= width {
        return vec![value.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in value.split_whitespace() {
        let needed = if current.is_empty() { 0 } else { current.chars().count() + 1 };
        if needed + word.chars().count() <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut chunks = split_long_token(word, width);
        if let Some(last) = chunks.pop() {
            lines.extend(chunks);
            current = last;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_token(token: &str, width: usize) -> Vec<String> {
    let chars = token.chars().collect::<Vec<char>>();
    chars
        .chunks(cmp::max(width, 1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let labels = columns
        .iter()
        .map(|column| format!("{}:", column.name))
        .collect::<Vec<String>>();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);

    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", row_index + 1));
        for (label, value) in labels.iter().zip(row) {
            output.push(format!("    {label:<label_width$}  {value}"));
        }
    }
    output
}

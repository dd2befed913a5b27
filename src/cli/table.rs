//! Fixed-width rendering of sheet rows.
//!
//! Columns: receipt label, date, description (40 chars), vat % with one
//! decimal, then cost/vat/gross with two decimals.

use colored::Colorize;

use crate::ledger::LineItem;

/// Label marking the in-progress working item row.
pub const WORKING_LABEL: &str = ">>>>";

const AMOUNT_RULE: &str = "----------";

pub fn format_row(label: &str, item: &LineItem) -> String {
    format!(
        "{:>4}  {:^10}  {:<40.40}  {:>5.1}  {:>10.2}  {:>10.2}  {:>10.2}",
        label,
        item.date.to_string(),
        item.desc,
        item.rate * 100.0,
        item.cost,
        item.vat,
        item.gross,
    )
}

fn format_columns(
    label: &str,
    date: &str,
    desc: &str,
    rate: &str,
    cost: &str,
    vat: &str,
    gross: &str,
) -> String {
    format!(
        "{:>4}  {:^10}  {:<40}  {:>5}  {:>10}  {:>10}  {:>10}",
        label, date, desc, rate, cost, vat, gross
    )
}

pub fn print_header() {
    println!("{}", "#".repeat(101));
    println!(
        "{}",
        format_columns("rcpt", "date", "description", "vat %", "cost", "vat", "gross")
    );
    println!(
        "{}",
        format_columns(
            "----",
            "----------",
            &"-".repeat(40),
            "-----",
            AMOUNT_RULE,
            AMOUNT_RULE,
            AMOUNT_RULE,
        )
    );
}

pub fn print_row(label: &str, item: &LineItem, highlight: bool) {
    let row = format_row(label, item);
    if highlight {
        println!("{}", row.bright_yellow());
    } else {
        println!("{}", row);
    }
}

/// Prints the totals footer framed by rules over the amount columns.
pub fn print_totals(totals: &LineItem) {
    let rule = format_columns("", "", "", "", AMOUNT_RULE, AMOUNT_RULE, AMOUNT_RULE);
    println!("{}", rule);
    println!(
        "{:>4}  {:^10}  {:<40}  {:>5}  {:>10.2}  {:>10.2}  {:>10.2}",
        "", "", "", "", totals.cost, totals.vat, totals.gross
    );
    println!("{}", rule);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(desc: &str) -> LineItem {
        let mut item = LineItem::new();
        item.set_date("2024-01-01").expect("date");
        item.set_desc(desc);
        item.set_gross("12.00").expect("gross");
        item
    }

    #[test]
    fn row_uses_two_decimal_amounts_and_percent_rate() {
        let row = format_row("1", &item("taxi"));
        assert!(row.contains("2024-01-01"));
        assert!(row.contains(" 20.0"));
        assert!(row.contains("10.00"));
        assert!(row.contains("2.00"));
        assert!(row.contains("12.00"));
    }

    #[test]
    fn long_descriptions_are_truncated_to_forty_chars() {
        let long = "x".repeat(60);
        let row = format_row("1", &item(&long));
        assert!(row.contains(&"x".repeat(40)));
        assert!(!row.contains(&"x".repeat(41)));
    }

    #[test]
    fn rows_share_one_column_layout() {
        let short = format_row("1", &item("a"));
        let exact = format_row("12", &item(&"y".repeat(40)));
        assert_eq!(short.len(), exact.len());
    }
}

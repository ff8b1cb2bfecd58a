//! Output formatting utilities for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};

/// Build a table with the standard look: condensed borders, cyan headers.
pub fn build_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    table
}

/// Print a table with headers
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    println!("{}", build_table(headers, rows));
}

/// Shorten text to `max` characters, marking the cut with "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// "1 code" / "3 codes"
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789abc", 8), "01234...");
        assert_eq!(truncate("ππππππ", 5), "ππ...");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "code"), "1 code");
        assert_eq!(plural(0, "code"), "0 codes");
        assert_eq!(plural(4, "duplicate"), "4 duplicates");
    }

    #[test]
    fn test_table_contains_cells() {
        let table = build_table(
            &["KIND", "CODE"],
            vec![vec!["subjective".to_string(), "*a;b".to_string()]],
        );
        let rendered = table.to_string();
        assert!(rendered.contains("KIND"));
        assert!(rendered.contains("*a;b"));
    }
}

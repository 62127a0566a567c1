//! Plain-text tables for command output.

use lbaas_client::rest::Map;
use lbaas_client::{Manager, Resource};
use serde_json::Value;

/// Formats a field value for a table cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Renders a bordered table with left-aligned cells.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };
    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(border.clone());
    out.push(render_row(&widths, headers.iter().copied()));
    out.push(border.clone());
    for row in rows {
        out.push(render_row(&widths, row.iter().map(String::as_str)));
    }
    out.push(border);
    out.join("\n")
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (width, cell) in widths.iter().zip(cells) {
        let padding = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line
}

/// One row per resource, one column per field; missing fields are blank.
pub fn print_list<M: Manager>(resources: &[Resource<M>], columns: &[&str]) {
    let rows: Vec<Vec<String>> = resources
        .iter()
        .map(|resource| {
            columns
                .iter()
                .map(|column| resource.peek(column).map(format_value).unwrap_or_default())
                .collect()
        })
        .collect();
    println!("{}", render_table(columns, &rows));
}

/// A `Property | Value` table sorted by property.
pub fn print_dict(fields: &Map) {
    println!("{}", render_dict(fields));
}

fn render_dict(fields: &Map) -> String {
    let mut rows: Vec<Vec<String>> = fields
        .iter()
        .map(|(key, value)| vec![key.clone(), format_value(value)])
        .collect();
    rows.sort();
    render_table(&["Property", "Value"], &rows)
}

/// A single-column table of a raw JSON list.
pub fn print_flat_list(values: &Value, header: &str) {
    let rows: Vec<Vec<String>> = match values {
        Value::Array(items) => items.iter().map(|item| vec![format_value(item)]).collect(),
        other => vec![vec![format_value(other)]],
    };
    println!("{}", render_table(&[header], &rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(
            &["id", "name"],
            &[
                vec!["1".to_string(), "fake".to_string()],
                vec!["22".to_string(), String::new()],
            ],
        );
        let expected = "\
+----+------+
| id | name |
+----+------+
| 1  | fake |
| 22 |      |
+----+------+";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_render_dict_sorts_properties() {
        let fields = match json!({"name": "fake", "id": "fakeid", "port": 80}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let table = render_dict(&fields);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[1], "| Property | Value  |");
        assert_eq!(lines[3], "| id       | fakeid |");
        assert_eq!(lines[5], "| port     | 80     |");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "");
        assert_eq!(format_value(&json!("x")), "x");
        assert_eq!(format_value(&json!(3)), "3");
        assert_eq!(format_value(&json!(["a"])), r#"["a"]"#);
    }
}

// src/table.rs
//
// Terminal output for search hits: an aligned plain-text table in sheet
// column order, plus the same rows as JSON for piping into other tools.

use crate::classify;
use crate::sheet::{Dataset, Record};

/// Render records as an aligned text table. Columns follow the sheet's
/// header order and every cell goes through the table display rule, so ranks
/// lose their decimals and scores gain them, exactly as on screen.
///
/// Widths are counted in chars, which is close enough for Thai text in a
/// monospace terminal.
pub fn render(dataset: &Dataset, records: &[&Record]) -> String {
    let headers = &dataset.headers;
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|h| {
                    let raw = record.get(h).map(String::as_str).unwrap_or("");
                    classify::format_cell(h, raw)
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().map(String::as_str), &widths);
    push_rule(&mut out, &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

/// The same hits as a JSON array of header-ordered objects. Values are the
/// raw sheet strings, not the display-formatted ones.
pub fn to_json(dataset: &Dataset, records: &[&Record]) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            let mut map = serde_json::Map::new();
            for header in &dataset.headers {
                let value = record.get(header).cloned().unwrap_or_default();
                map.insert(header.clone(), serde_json::Value::String(value));
            }
            serde_json::Value::Object(map)
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        if i + 1 < widths.len() {
            for _ in 0..widths[i].saturating_sub(cell.chars().count()) {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}

fn push_rule(out: &mut String, widths: &[usize]) {
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        for _ in 0..*width {
            out.push('-');
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search;
    use crate::sheet::Dataset;

    fn dataset() -> Dataset {
        Dataset::from_text(
            "ชื่อ,ลำดับที่สอบ,คะแนนรวม\n\
             สมชาย,7,61.25\n\
             สมหญิง,2,74\n",
        )
    }

    #[test]
    fn table_applies_display_formatting() {
        let data = dataset();
        let all = search::filter(&data, "สม");
        let text = render(&data, &all);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4); // header, rule, two rows
        assert!(lines[0].starts_with("ชื่อ"));
        // rank stays integer, score gains two decimals
        assert!(lines[2].contains("7 "));
        assert!(lines[2].contains("61.25"));
        assert!(lines[3].contains("74.00"));
    }

    #[test]
    fn json_rows_keep_header_order_and_raw_values() {
        let data = dataset();
        let all = search::filter(&data, "สม");
        let json = to_json(&data, &all);
        let rows = json.as_array().expect("array");
        assert_eq!(rows.len(), 2);
        let keys: Vec<String> = rows[0].as_object().expect("object").keys().cloned().collect();
        assert_eq!(keys, ["ชื่อ", "ลำดับที่สอบ", "คะแนนรวม"]);
        // raw value, not the 2-decimal display form
        assert_eq!(rows[1]["คะแนนรวม"], "74");
    }
}

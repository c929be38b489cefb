// src/sheet/parse.rs
//
// Hand-rolled splitter for the published sheet. The gviz CSV endpoint quotes
// every field it emits, so the scanner honors `""` escapes and commas inside
// quotes. Beyond that it is deliberately lenient: ragged rows, stray quotes
// and unterminated quotes are absorbed into best-effort output, never raised.
// Whether a body is tabular at all is decided by the fetch layer before this
// module ever sees it.

use std::collections::HashMap;

use super::Record;

/// Split a full document into the trimmed header row plus one `Record` per
/// surviving line.
///
/// Lines that are empty after trimming are discarded (including a blank last
/// line, and any row whose fields are all quoted-empty). Rows shorter than
/// the header are padded with `""`, longer rows lose the extra fields, and a
/// header name that repeats keeps the value of the last column bearing it.
pub fn parse(text: &str) -> (Vec<String>, Vec<Record>) {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect();

    let Some((first, rest)) = lines.split_first() else {
        return (Vec::new(), Vec::new());
    };

    let headers: Vec<String> = split_line(first)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::with_capacity(rest.len());
    for line in rest {
        let values = split_line(line);
        let mut record: Record = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            let value = values.get(i).cloned().unwrap_or_default();
            record.insert(header.clone(), value);
        }
        records.push(record);
    }

    (headers, records)
}

/// Quote-aware field scan of a single line.
///
/// `""` inside a quoted field emits a literal quote, a comma only ends the
/// field outside quotes, and end of line flushes the last field even when a
/// quote was never closed. Every emitted field is trimmed and then loses at
/// most one surrounding quote on each side; that last step is a plain strip,
/// so text that merely happens to start and end with a quote loses them too.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quote && chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quote = !in_quote;
                }
            }
            ',' if !in_quote => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields
        .into_iter()
        .map(|field| strip_outer_quotes(field.trim()))
        .collect()
}

fn strip_outer_quotes(field: &str) -> String {
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.to_string()
}

//! Plain-text tables for query results.

use super::Rows;
use crate::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStyle {
    pub intersection: char,
    pub hbar: char,
    pub vbar: char,
    pub lmargin: usize,
    pub rmargin: usize,
    pub align: Align,
    pub fill: char,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self { intersection: '+', hbar: '-', vbar: '|', lmargin: 1, rmargin: 1, align: Align::Center, fill: ' ' }
    }
}

fn pad(text: &str, width: usize, align: Align, fill: char) -> String {
    let gap = width.saturating_sub(text.chars().count());
    let (left, right) = match align {
        Align::Left => (0, gap),
        Align::Right => (gap, 0),
        Align::Center => (gap / 2, gap - gap / 2),
    };
    let mut s = String::with_capacity(text.len() + gap);
    s.extend(std::iter::repeat(fill).take(left));
    s.push_str(text);
    s.extend(std::iter::repeat(fill).take(right));
    s
}

/// Render `rows` as a boxed table.
///
/// An empty `header` means no header line. Nothing at all to show gives an
/// empty string; a header without rows is still boxed.
pub fn format_table(rows: &Rows, style: &TableStyle) -> String {
    let has_header = !rows.header.is_empty();
    if !has_header && rows.rows.is_empty() {
        return String::new();
    }

    let body: Vec<Vec<String>> =
        rows.rows.iter().map(|r| r.iter().map(Value::to_string).collect()).collect();
    let columns = body.iter().map(Vec::len).chain([rows.header.len()]).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    let lines = body.iter().chain(has_header.then_some(&rows.header));
    for line in lines {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut delim = String::new();
    delim.push(style.intersection);
    for w in &widths {
        delim.extend(std::iter::repeat(style.hbar).take(w + style.lmargin + style.rmargin));
        delim.push(style.intersection);
    }
    delim.push('\n');

    let lmargin: String = std::iter::repeat(style.fill).take(style.lmargin).collect();
    let rmargin: String = std::iter::repeat(style.fill).take(style.rmargin).collect();
    let line = |cells: &[String]| {
        let mut s = String::new();
        s.push(style.vbar);
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            s.push_str(&lmargin);
            s.push_str(&pad(cell, *w, style.align, style.fill));
            s.push_str(&rmargin);
            s.push(style.vbar);
        }
        s.push('\n');
        s
    };

    let mut out = String::new();
    if has_header {
        out.push_str(&delim);
        out.push_str(&line(&rows.header));
    }
    out.push_str(&delim);
    if !body.is_empty() {
        for r in &body {
            out.push_str(&line(r));
        }
        out.push_str(&delim);
    }
    out
}

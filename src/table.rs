use serde::Deserialize;

use crate::parser::ContactRecord;

pub const NAME_LABEL: &str = "姓名";
pub const EMAIL_LABEL: &str = "EMAIL";

/// Target display widths for the three columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub name: usize,
    pub secondary: usize,
    pub email: usize,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            name: 12,
            secondary: 12,
            email: 30,
        }
    }
}

impl Columns {
    pub fn total(&self) -> usize {
        self.name + self.secondary + self.email
    }
}

/// CJK Unified Ideographs take two columns, everything else one.
pub fn char_width(c: char) -> usize {
    if ('\u{4E00}'..='\u{9FFF}').contains(&c) {
        2
    } else {
        1
    }
}

pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Append spaces until `s` reaches `width` display columns. Never truncates.
pub fn pad_to(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    let mut out = String::with_capacity(s.len() + fill);
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(fill));
    out
}

fn row(out: &mut String, cols: &Columns, name: &str, secondary: &str, email: &str) {
    out.push_str(&pad_to(name, cols.name));
    out.push_str(&pad_to(secondary, cols.secondary));
    out.push_str(&pad_to(email, cols.email));
    out.push('\n');
}

/// Header, dashed rule, then one line per record. Every line ends with `\n`.
pub fn format_table(records: &[ContactRecord], cols: &Columns, secondary_label: &str) -> String {
    let mut out = String::new();
    row(&mut out, cols, NAME_LABEL, secondary_label, EMAIL_LABEL);
    out.push_str(&"-".repeat(cols.total()));
    out.push('\n');
    for r in records {
        row(&mut out, cols, &r.name, &r.secondary, &r.email);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("王小明"), 6);
        assert_eq!(display_width("王小明A"), 7);
        assert_eq!(display_width(""), 0);
        // Range edges.
        assert_eq!(char_width('\u{4E00}'), 2);
        assert_eq!(char_width('\u{9FFF}'), 2);
        assert_eq!(char_width('\u{4DFF}'), 1);
        assert_eq!(char_width('\u{A000}'), 1);
        // Fullwidth punctuation is outside the ideograph range.
        assert_eq!(char_width('：'), 1);
    }

    #[test]
    fn pads_cjk_name() {
        let padded = pad_to("王小明A", 12);
        assert_eq!(padded, "王小明A     ");
        assert!(padded.ends_with(&" ".repeat(5)));
        assert_eq!(display_width(&padded), 12);
    }

    #[test]
    fn overlong_field_is_not_truncated() {
        assert_eq!(pad_to("averyveryverylongname", 4), "averyveryverylongname");
    }

    #[test]
    fn empty_table_has_header_and_rule_only() {
        let cols = Columns::default();
        let text = format_table(&[], &cols, "分機");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(display_width(lines[0]), cols.total());
        assert!(lines[0].starts_with("姓名"));
        assert_eq!(lines[1], "-".repeat(54));
    }

    #[test]
    fn rows_align_on_display_columns() {
        let cols = Columns::default();
        let records = vec![
            ContactRecord::new("王小明A", "8801", "wang@ncut.edu.tw").unwrap(),
            ContactRecord::new("Bob", "Professor", "bob@ncut.edu.tw").unwrap(),
        ];
        let text = format_table(&records, &cols, "職稱");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], format!("王小明A     8801        {}", pad_to("wang@ncut.edu.tw", 30)));
        for line in &lines {
            assert_eq!(display_width(line), cols.total());
        }
        assert!(text.ends_with('\n'));
    }
}

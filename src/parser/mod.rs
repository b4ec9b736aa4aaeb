pub mod extract;
pub mod rules;

use serde::Serialize;

pub use extract::extract;
pub use rules::{ExtractionRuleset, RecordScope};

/// One directory entry: name, ruleset-dependent secondary field, email.
///
/// `secondary` carries an extension number or a job title depending on which
/// ruleset produced it. The ruleset's `secondary_label` names it for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    pub name: String,
    pub secondary: String,
    pub email: String,
}

impl ContactRecord {
    /// Trims every field. Returns `None` if any field ends up empty.
    pub fn new(name: &str, secondary: &str, email: &str) -> Option<Self> {
        let (name, secondary, email) = (name.trim(), secondary.trim(), email.trim());
        if name.is_empty() || secondary.is_empty() || email.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            secondary: secondary.to_string(),
            email: email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_fields() {
        let r = ContactRecord::new("  王小明 ", "\t1234\n", " a@b.tw ").unwrap();
        assert_eq!(r.name, "王小明");
        assert_eq!(r.secondary, "1234");
        assert_eq!(r.email, "a@b.tw");
    }

    #[test]
    fn rejects_blank_field() {
        assert!(ContactRecord::new("Alice", "   ", "a@b.tw").is_none());
        assert!(ContactRecord::new("", "1", "a@b.tw").is_none());
        assert!(ContactRecord::new("Alice", "1", "\n").is_none());
    }
}

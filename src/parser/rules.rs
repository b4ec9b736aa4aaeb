use std::sync::LazyLock;

use regex::Regex;

// Faculty directory layout: `title="姓名"` anchors, "分機 1234", "信箱：x@y".
static NAME_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"title="([^"]+)""#).unwrap());
static EXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"分機\s*(\d+)").unwrap());
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"信箱：([\w\.-]+@[\w\.-]+)").unwrap());

// Staff directory layout: same anchors, "職稱：..." instead of an extension.
static JOB_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"職稱[：:]\s*([^<\r\n]+)").unwrap());
static EMAIL_LOOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"信箱[：:]\s*([\w.\-]+@[\w.\-]+)").unwrap());

pub const DEFAULT_RULESET: &str = "extension";

/// How field matches are grouped into records.
#[derive(Debug, Clone)]
pub enum RecordScope {
    /// Each pattern runs over the whole document; matches pair up by index.
    Document,
    /// The document is cut at every match of `start`; fields pair up within a block.
    Blocks { start: Regex },
}

/// Three field patterns plus the tag that says what `secondary` means.
#[derive(Debug, Clone)]
pub struct ExtractionRuleset {
    pub id: String,
    pub secondary_label: String,
    pub name: Regex,
    pub secondary: Regex,
    pub email: Regex,
    pub scope: RecordScope,
}

impl ExtractionRuleset {
    pub fn compile(
        id: &str,
        secondary_label: &str,
        name: &str,
        secondary: &str,
        email: &str,
        block_start: Option<&str>,
    ) -> Result<Self, regex::Error> {
        let scope = match block_start {
            Some(start) => RecordScope::Blocks {
                start: Regex::new(start)?,
            },
            None => RecordScope::Document,
        };
        Ok(Self {
            id: id.to_string(),
            secondary_label: secondary_label.to_string(),
            name: Regex::new(name)?,
            secondary: Regex::new(secondary)?,
            email: Regex::new(email)?,
            scope,
        })
    }

    /// Built-in ruleset by id.
    pub fn builtin(id: &str) -> Option<Self> {
        let (label, secondary, email) = match id {
            "extension" => ("分機", &*EXT_RE, &*EMAIL_RE),
            "title" => ("職稱", &*JOB_TITLE_RE, &*EMAIL_LOOSE_RE),
            _ => return None,
        };
        Some(Self {
            id: id.to_string(),
            secondary_label: label.to_string(),
            name: NAME_ATTR_RE.clone(),
            secondary: secondary.clone(),
            email: email.clone(),
            scope: RecordScope::Document,
        })
    }

    pub fn builtin_ids() -> &'static [&'static str] {
        &["extension", "title"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve() {
        for id in ExtractionRuleset::builtin_ids() {
            let r = ExtractionRuleset::builtin(id).unwrap();
            assert_eq!(&r.id, id);
            assert!(matches!(r.scope, RecordScope::Document));
        }
        assert_eq!(ExtractionRuleset::builtin(DEFAULT_RULESET).unwrap().secondary_label, "分機");
        assert!(ExtractionRuleset::builtin("nope").is_none());
    }

    #[test]
    fn compile_with_block_start() {
        let r = ExtractionRuleset::compile(
            "cards",
            "Title",
            r#"<h3>([^<]+)</h3>"#,
            r#"<p class="role">([^<]+)</p>"#,
            r"mailto:([^\x22]+)",
            Some(r#"<div class="card">"#),
        )
        .unwrap();
        assert!(matches!(r.scope, RecordScope::Blocks { .. }));
    }

    #[test]
    fn compile_rejects_bad_pattern() {
        assert!(ExtractionRuleset::compile("x", "X", "(", "a", "b", None).is_err());
    }
}

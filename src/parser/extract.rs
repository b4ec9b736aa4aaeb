use regex::Regex;
use tracing::debug;

use super::{ContactRecord, ExtractionRuleset, RecordScope};

/// Pull contact records out of raw markup. Never fails; bad markup yields fewer records.
pub fn extract(markup: &str, ruleset: &ExtractionRuleset) -> Vec<ContactRecord> {
    match &ruleset.scope {
        RecordScope::Document => extract_positional(markup, ruleset),
        RecordScope::Blocks { start } => extract_blocks(markup, start, ruleset),
    }
}

/// Group 1 if the pattern has one, else the whole match. Decided per pattern,
/// so an optional group that did not take part yields an empty field.
fn field<'a>(re: &Regex, caps: &regex::Captures<'a>) -> &'a str {
    let group = if re.captures_len() > 1 { 1 } else { 0 };
    caps.get(group).map_or("", |m| m.as_str())
}

/// All non-overlapping matches in document order.
fn find_all<'a>(re: &Regex, text: &'a str) -> Vec<&'a str> {
    re.captures_iter(text).map(|caps| field(re, &caps)).collect()
}

fn find_first<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text).map(|caps| field(re, &caps))
}

fn extract_positional(markup: &str, ruleset: &ExtractionRuleset) -> Vec<ContactRecord> {
    let names = find_all(&ruleset.name, markup);
    let secondaries = find_all(&ruleset.secondary, markup);
    let emails = find_all(&ruleset.email, markup);

    let paired = names.len().min(secondaries.len()).min(emails.len());
    debug!(
        ruleset = %ruleset.id,
        names = names.len(),
        secondaries = secondaries.len(),
        emails = emails.len(),
        paired,
        "positional match counts"
    );

    names
        .iter()
        .zip(&secondaries)
        .zip(&emails)
        .filter_map(|((n, s), e)| ContactRecord::new(n, s, e))
        .collect()
}

/// Split at each `start` match; text before the first one is not part of any record.
fn split_blocks<'a>(markup: &'a str, start: &Regex) -> Vec<&'a str> {
    let starts: Vec<usize> = start.find_iter(markup).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &from)| {
            let to = starts.get(i + 1).copied().unwrap_or(markup.len());
            &markup[from..to]
        })
        .collect()
}

fn extract_blocks(markup: &str, start: &Regex, ruleset: &ExtractionRuleset) -> Vec<ContactRecord> {
    let blocks = split_blocks(markup, start);
    let records: Vec<ContactRecord> = blocks
        .iter()
        .filter_map(|block| {
            ContactRecord::new(
                find_first(&ruleset.name, block)?,
                find_first(&ruleset.secondary, block)?,
                find_first(&ruleset.email, block)?,
            )
        })
        .collect();

    debug!(
        ruleset = %ruleset.id,
        blocks = blocks.len(),
        records = records.len(),
        "block match counts"
    );
    records
}

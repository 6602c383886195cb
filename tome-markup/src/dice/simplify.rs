//! Cleanup pass over text that contains roller markers
//!
//! Source prose often repeats a value next to the tag that computes it, e.g.
//! `26 ({@hit 8})`. After resolution that reads `` 26 (`dice:1d20+8|noform|text(+8)`) ``, so the
//! number moves into the marker label and the formula becomes a trailing parenthetical.
//!
//! The passes are order-dependent and that order is fixed:
//! 1. collapse `N (<marker with text(M)>)`
//! 2. collapse `N (<unlabelled marker with avg> (<formula>))`, skipped for spell-progression prose
//! 3. escape pipes for Markdown table cells, always last so the marker patterns above still
//!    see raw `|` separators
//!
//! Running the pass again over its own output changes nothing.

use once_cell::sync::Lazy;
use regex::Regex;

static REPEATED_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?P<n>\d+) \(`dice:(?P<formula>[^`|]+)(?P<flags>(?:\|[a-z]+)*)\|text\((?P<inner>[^)`]*)\)`\)",
    )
    .unwrap()
});

static REPEATED_AVERAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?P<n>\d+) \(`dice:(?P<formula>[^`|]+)\|noform\|avg` \(`(?P<dice>[^`]+)`\)\)",
    )
    .unwrap()
});

/// Prose describing progression by level, where the average collapse would be wrong
const PROGRESSION_PROSE: &str = "reach levels";

pub fn simplify_dice_text(text: &str, in_markdown_table: bool) -> String {
    let mut result = REPEATED_LABEL
        .replace_all(text, "`dice:${formula}${flags}|text(${n})` (`${inner}`)")
        .into_owned();

    if !result.contains(PROGRESSION_PROSE) {
        result = REPEATED_AVERAGE
            .replace_all(&result, "`dice:${formula}|noform|avg|text(${n})` (`${dice}`)")
            .into_owned();
    }

    if in_markdown_table {
        result = escape_table_pipes(&result);
    }
    result
}

/// Escape every `|` not already preceded by a backslash.
pub fn escape_table_pipes(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == '|' && previous != Some('\\') {
            escaped.push('\\');
        }
        escaped.push(c);
        previous = Some(c);
    }
    escaped
}

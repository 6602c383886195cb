//! Admonition fences for embedded notes
//!
//! A rendered note embedded inside another note is wrapped in a fenced block:
//!
//! ````text
//! ```ad-statblock
//! ...content...
//! ```
//! ````
//!
//! The fence has to be longer than any backtick-only line inside the content, otherwise the
//! first inner fence would close the admonition early.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MarkupError;

const MIN_FENCE: usize = 3;

/// `<indent><backticks>ad-<kind...>`
static ADMONITION_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<indent>\s*)(?P<fence>`{3,})(?P<rest>ad-\S.*)$").unwrap());

/// `<indent><backticks>` and nothing else
static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<indent>\s*)`{3,}\s*$").unwrap());

/// Lines of content plus the fence that safely encloses them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAdmonition {
    pub kind: String,
    pub fence: String,
    pub lines: Vec<String>,
}

impl RenderedAdmonition {
    pub fn new(kind: impl Into<String>, lines: Vec<String>) -> Self {
        let fence = nested_embed(&lines);
        RenderedAdmonition {
            kind: kind.into(),
            fence,
            lines,
        }
    }

    /// Header, content and closing fence. Empty content produces no lines at all.
    pub fn into_lines(self) -> Vec<String> {
        if self.lines.is_empty() {
            return self.lines;
        }
        let mut out = Vec::with_capacity(self.lines.len() + 2);
        out.push(format!("{}ad-{}", self.fence, self.kind));
        out.extend(self.lines);
        out.push(self.fence);
        out
    }
}

/// Longest line made only of backticks, ignoring surrounding whitespace
fn longest_backtick_line<S: AsRef<str>>(lines: &[S]) -> usize {
    lines
        .iter()
        .map(|line| line.as_ref().trim())
        .filter(|line| !line.is_empty() && line.chars().all(|c| c == '`'))
        .map(str::len)
        .max()
        .unwrap_or(0)
}

/// A fence one backtick longer than any backtick-only line in `lines`, at least three long.
pub fn nested_embed<S: AsRef<str>>(lines: &[S]) -> String {
    "`".repeat((longest_backtick_line(lines) + 1).max(MIN_FENCE))
}

pub fn wrap_admonition(lines: Vec<String>, kind: &str) -> Vec<String> {
    RenderedAdmonition::new(kind, lines).into_lines()
}

/// Re-fence a complete rendered note so that its outer admonition outranks every fence inside.
///
/// The first and last non-blank lines must be the admonition header and its closing fence.
pub fn balance_backticks<S: AsRef<str>>(lines: &[S]) -> Result<Vec<String>, MarkupError> {
    let is_blank = |line: &S| line.as_ref().trim().is_empty();
    let first = lines.iter().position(|l| !is_blank(l));
    let last = lines.iter().rposition(|l| !is_blank(l));
    let (Some(first), Some(last)) = (first, last) else {
        return Err(MarkupError::MalformedAdmonition(
            "no content to embed".to_string(),
        ));
    };
    if first == last {
        return Err(MarkupError::MalformedAdmonition(
            "header and closing fence are the same line".to_string(),
        ));
    }

    let header = lines[first].as_ref();
    let Some(open) = ADMONITION_OPEN.captures(header) else {
        return Err(MarkupError::MalformedAdmonition(format!(
            "expected an admonition header, found '{header}'"
        )));
    };
    let footer = lines[last].as_ref();
    let Some(close) = BARE_FENCE.captures(footer) else {
        return Err(MarkupError::MalformedAdmonition(format!(
            "expected a closing fence, found '{footer}'"
        )));
    };

    let inner: Vec<String> = lines[first + 1..last]
        .iter()
        .map(|l| l.as_ref().to_string())
        .collect();
    let fence = nested_embed(&inner);

    let mut out: Vec<String> = lines[..first]
        .iter()
        .map(|l| l.as_ref().to_string())
        .collect();
    out.push(format!("{}{fence}{}", &open["indent"], &open["rest"]));
    out.extend(inner);
    out.push(format!("{}{fence}", &close["indent"]));
    out.extend(lines[last + 1..].iter().map(|l| l.as_ref().to_string()));
    Ok(out)
}

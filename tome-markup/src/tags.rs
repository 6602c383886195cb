//! Inline tag tokens
//!
//! A tag token reads `{@name argument}`. The argument is split on `|` into parts; the first
//! part is usually the text or expression, later parts are tag-specific.
//!
//! Tokens arrive here after their inner tokens were already resolved, so an argument may
//! contain rendered output such as `` `dice:1d6|noform|avg` ``. Pipes inside inline code spans
//! are not part separators.

/// Tags that only wrap their text in emphasis
pub const FORMATTING_TAGS: &[&str] = &[
    "b",
    "bold",
    "i",
    "italic",
    "s",
    "strike",
    "u",
    "underline",
    "code",
    "note",
];

pub const FOOTNOTE_TAG: &str = "footnote";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub raw_argument: String,
    source: String,
}

impl Tag {
    /// Parse a complete `{@name argument}` token. Returns `None` for other brace groups.
    pub fn parse(token: &str) -> Option<Tag> {
        let inner = token.strip_prefix("{@")?.strip_suffix('}')?;
        let (name, argument) = match inner.find(char::is_whitespace) {
            Some(pos) => (&inner[..pos], inner[pos..].trim_start()),
            None => (inner, ""),
        };
        Some(Tag {
            name: name.to_string(),
            raw_argument: argument.to_string(),
            source: token.to_string(),
        })
    }

    /// The token as it appeared in the input
    pub fn source(&self) -> &str {
        &self.source
    }

    /// `|`-separated parts of the argument, ignoring pipes inside code spans
    pub fn parts(&self) -> Vec<&str> {
        let mut parts = Vec::new();
        let mut in_code = false;
        let mut start = 0;
        for (index, c) in self.raw_argument.char_indices() {
            match c {
                '`' => in_code = !in_code,
                '|' if !in_code => {
                    parts.push(&self.raw_argument[start..index]);
                    start = index + 1;
                }
                _ => {}
            }
        }
        parts.push(&self.raw_argument[start..]);
        parts
    }

    /// First part, the text most tags display
    pub fn display_text(&self) -> &str {
        self.parts().first().copied().unwrap_or_default()
    }
}

pub fn is_formatting_tag(name: &str) -> bool {
    FORMATTING_TAGS.contains(&name)
}

/// Render a formatting tag as Markdown, or as HTML while inside an HTML table where
/// Markdown is not interpreted.
pub fn render_formatting(tag: &Tag, in_html_table: bool) -> Option<String> {
    let text = tag.display_text();
    let (markdown, html) = match tag.name.as_str() {
        "b" | "bold" => ("**", "b"),
        "i" | "italic" => ("*", "i"),
        "s" | "strike" => ("~~", "s"),
        "u" | "underline" => ("_", "u"),
        "code" => ("`", "code"),
        "note" => return Some(text.to_string()),
        _ => return None,
    };
    if in_html_table {
        Some(format!("<{html}>{text}</{html}>"))
    } else {
        Some(format!("{markdown}{text}{markdown}"))
    }
}

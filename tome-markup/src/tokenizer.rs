//! Brace-matching token scanner
//!
//! Scans text left to right with a stack of owned buffers. An opening brace parks the current
//! buffer and starts a new one; a closing brace hands the finished `{...}` token to the
//! resolver and splices the replacement into the parent buffer. Inner tokens therefore resolve
//! before the tokens that contain them.
//!
//! Malformed nesting never aborts the scan:
//! - a `}` with nothing open is kept as a literal character
//! - braces still open at the end are folded back into the text verbatim

use crate::diagnostics::{Diagnostic, DiagnosticKind};

/// Marker emitted for the dice roller plugin
pub const DICE_MARKER: &str = "`dice:";

/// Result of a token scan
#[derive(Debug, Clone, PartialEq)]
pub struct Tokenized {
    pub text: String,
    /// True when any resolver output contained a roller marker
    pub found_dice: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Replace every brace-delimited token in `input` with the resolver's output.
///
/// The resolver receives the complete token (braces included) and whether the token sits
/// inside another open token.
pub fn replace_tokens<F>(input: &str, mut resolve: F) -> Tokenized
where
    F: FnMut(&str, bool) -> String,
{
    let mut stack: Vec<String> = Vec::new();
    let mut opened_at: Vec<usize> = Vec::new();
    let mut buffer = String::with_capacity(input.len());
    let mut found_dice = false;
    let mut diagnostics = Vec::new();

    for (offset, c) in input.char_indices() {
        match c {
            '{' => {
                stack.push(std::mem::take(&mut buffer));
                opened_at.push(offset);
                buffer.push('{');
            }
            '}' => {
                let Some(parent) = stack.pop() else {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MismatchedBrace,
                        format!(
                            "Mismatched braces? Found '}}' with nothing open at offset {offset}: {}",
                            excerpt(input, offset)
                        ),
                    ));
                    buffer.push('}');
                    continue;
                };
                opened_at.pop();
                buffer.push('}');
                let nested = !stack.is_empty();
                let replacement = resolve(&buffer, nested);
                if replacement.contains(DICE_MARKER) {
                    found_dice = true;
                }
                buffer = parent;
                buffer.push_str(&replacement);
            }
            _ => buffer.push(c),
        }
    }

    if let Some(&first_open) = opened_at.first() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnclosedBrace,
            format!(
                "Unclosed braces ({} open), first at offset {first_open}: {}",
                stack.len(),
                excerpt(input, first_open)
            ),
        ));
        while let Some(mut parent) = stack.pop() {
            parent.push_str(&buffer);
            buffer = parent;
        }
    }

    Tokenized {
        text: buffer,
        found_dice,
        diagnostics,
    }
}

/// Up to `EXCERPT_CHARS` characters either side of the byte offset `at`
fn excerpt(input: &str, at: usize) -> String {
    const EXCERPT_CHARS: usize = 20;
    let start = input[..at]
        .char_indices()
        .rev()
        .nth(EXCERPT_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let end = input[at..]
        .char_indices()
        .nth(EXCERPT_CHARS + 1)
        .map_or(input.len(), |(i, _)| at + i);
    let mut text = String::new();
    if start > 0 {
        text.push_str("...");
    }
    text.push_str(&input[start..end]);
    if end < input.len() {
        text.push_str("...");
    }
    text
}

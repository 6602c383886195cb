//! Text renderer
//!
//! [`TextRenderer`] owns everything one document rendering needs: the options, the context
//! stack and the diagnostics sink. It is not meant to be shared between documents rendered in
//! parallel; give each worker its own renderer.
//!
//! Context changes are scoped with closures so every frame pushed is popped exactly once:
//!
//! ```ignore
//! let mut renderer = TextRenderer::new(RenderOptions::with_roller(RollerMode::Enabled));
//! let cell = renderer.with_markdown_table(|r| r.replace_text("{@damage 1d6}"));
//! // cell == "`dice:1d6\|noform\|avg` (`1d6`)"
//! ```

use crate::admonition::balance_backticks;
use crate::context::ParseState;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::dice::{is_dice_tag, resolve_dice_tag, simplify_dice_text, DiceFormulaState};
use crate::options::RenderOptions;
use crate::tags::{is_formatting_tag, render_formatting, Tag, FOOTNOTE_TAG};
use crate::tokenizer::replace_tokens;

pub struct TextRenderer {
    options: RenderOptions,
    state: ParseState,
    diagnostics: Diagnostics,
    next_footnote: usize,
}

impl TextRenderer {
    pub fn new(options: RenderOptions) -> Self {
        TextRenderer {
            options,
            state: ParseState::new(),
            diagnostics: Diagnostics::new(),
            next_footnote: 1,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Direct stack access for callers that manage push/pop pairs themselves.
    /// Pair every push with [`TextRenderer::pop`].
    pub fn state_mut(&mut self) -> &mut ParseState {
        &mut self.state
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// Formula state for the current top frame
    pub fn formula_state(&self) -> DiceFormulaState {
        DiceFormulaState::new(self.options.roller, self.state.current())
    }

    /// Resolve every tag in one text unit.
    pub fn replace_text(&mut self, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }
        let tokenized = replace_tokens(input, |token, nested| self.resolve_token(token, nested));
        self.diagnostics.extend(tokenized.diagnostics);
        if tokenized.found_dice {
            simplify_dice_text(&tokenized.text, self.state.current().in_markdown_table)
        } else {
            tokenized.text
        }
    }

    fn resolve_token(&mut self, token: &str, nested: bool) -> String {
        let Some(tag) = Tag::parse(token) else {
            return token.to_string();
        };
        log::trace!("resolving {} (nested: {nested})", tag.source());

        if tag.name.is_empty() {
            self.diagnostics.warn(
                DiagnosticKind::BadTagFormat,
                format!("Tag without a name: {token}"),
            );
            return tag.raw_argument;
        }
        if is_dice_tag(&tag.name) {
            let state = self.formula_state();
            return resolve_dice_tag(&tag, state, &mut self.diagnostics);
        }
        if tag.name == FOOTNOTE_TAG {
            return self.resolve_footnote(&tag, nested);
        }
        if is_formatting_tag(&tag.name) {
            if let Some(text) = render_formatting(&tag, self.state.current().in_html_table) {
                return text;
            }
        }

        self.diagnostics.warn(
            DiagnosticKind::UnknownTag,
            format!("Unknown tag {{@{}}} in {token}", tag.name),
        );
        tag.display_text().to_string()
    }

    /// `{@footnote display|note|key?}`
    fn resolve_footnote(&mut self, tag: &Tag, nested: bool) -> String {
        let parts = tag.parts();
        let display = parts[0].trim();
        let Some(note) = parts.get(1).map(|p| p.trim()).filter(|p| !p.is_empty()) else {
            self.diagnostics.warn(
                DiagnosticKind::BadTagFormat,
                format!("Footnote without text: {}", tag.source()),
            );
            return display.to_string();
        };

        if nested || self.state.current().in_footnotes {
            return format!("{display} ({note})");
        }

        let key = match parts.get(2).map(|p| p.trim()).filter(|p| !p.is_empty()) {
            Some(key) => {
                if let Some(existing) = self.state.citations().get(key) {
                    if existing != note {
                        self.diagnostics.warn(
                            DiagnosticKind::BadTagFormat,
                            format!(
                                "Footnote key '{key}' reused with different text: {}",
                                tag.source()
                            ),
                        );
                    }
                }
                key.to_string()
            }
            None => self.next_footnote_key(),
        };
        match self.state.add_citation(key.as_str(), note) {
            Ok(()) => format!("{display}[^{key}]"),
            Err(err) => {
                self.diagnostics.report(err.into());
                format!("{display} ({note})")
            }
        }
    }

    /// Next automatic footnote number not already taken by an explicit key.
    fn next_footnote_key(&mut self) -> String {
        loop {
            let key = self.next_footnote.to_string();
            self.next_footnote += 1;
            if self.state.citations().get(&key).is_none() {
                return key;
            }
        }
    }

    /// Pop the frame created by a push that returned `pushed`, reporting misuse.
    pub fn pop(&mut self, pushed: bool) {
        if let Err(err) = self.state.pop(pushed) {
            self.diagnostics.report(err.into());
        }
    }

    fn scoped<R>(
        &mut self,
        push: impl FnOnce(&mut ParseState) -> bool,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let pushed = push(&mut self.state);
        let result = body(self);
        self.pop(pushed);
        result
    }

    pub fn with_source<R>(
        &mut self,
        source: Option<&str>,
        page: u32,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.scoped(|state| state.push_source(source, page), body)
    }

    pub fn with_footnotes<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(|state| state.push_footnotes(true), body)
    }

    pub fn with_html_table<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(|state| state.push_html_table(true), body)
    }

    pub fn with_markdown_table<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(|state| state.push_markdown_table(true), body)
    }

    pub fn with_trait<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(|state| state.push_trait(true), body)
    }

    pub fn with_list_indent<R>(&mut self, indent: &str, body: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(|state| state.push_list_indent(indent), body)
    }

    /// One list level deeper than the current frame
    pub fn indented_list<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        let indent = format!(
            "{}{}",
            self.state.current().list_indent,
            self.options.list_indent
        );
        self.with_list_indent(&indent, body)
    }

    pub fn with_feature_type_depth<R>(
        &mut self,
        depth: u32,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.scoped(|state| state.push_feature_type_depth(depth), body)
    }

    /// Heading one level below the current feature depth
    pub fn heading(&mut self, title: &str) -> String {
        let level = (self.state.current().feature_type_depth as usize + 1).min(6);
        format!("{} {}", "#".repeat(level), self.replace_text(title))
    }

    /// Prepare a complete rendered note for embedding under the current list item.
    ///
    /// The note's outer fence is lengthened past any inner fence, then every line gets the
    /// current list indent. A note without the expected outer markers is embedded unchanged.
    pub fn embed_note<S: AsRef<str>>(&mut self, lines: &[S]) -> Vec<String> {
        let balanced = match balance_backticks(lines) {
            Ok(balanced) => balanced,
            Err(err) => {
                self.diagnostics.report(err.into());
                lines.iter().map(|l| l.as_ref().to_string()).collect()
            }
        };
        let indent = &self.state.current().list_indent;
        balanced
            .into_iter()
            .map(|line| {
                if line.is_empty() {
                    line
                } else {
                    format!("{indent}{line}")
                }
            })
            .collect()
    }

    /// Footer lines for every citation gathered so far
    pub fn flush_footnotes(&mut self) -> Vec<String> {
        self.state.flush_citations()
    }

    /// `"PHB p. 12"` for the current frame
    pub fn source_page(&self) -> Option<String> {
        self.state.source_page()
    }
}

//! Rendering context stack
//!
//! A [`ParseState`] is a stack of immutable [`ParseFrame`] snapshots. Entering a nested
//! rendering scope (an embedded note, a table, a deeper list) pushes a copy of the top frame
//! with one dimension changed; leaving the scope pops it. Only the top frame is observable.
//!
//! Pushes report whether a frame was actually created: asking for the state the top frame
//! already has is a no-op. Callers hand that flag back to [`ParseState::pop`], so a scope that
//! changed nothing also removes nothing.
//!
//! Citations (footnotes) live alongside the stack and are only valid while a frame is active.
//! Emptying the stack with citations still pending is reported as an error.

use crate::error::ContextError;

/// One immutable snapshot of rendering state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseFrame {
    pub source: Option<String>,
    /// Page within the source, 0 when unknown
    pub page: u32,
    pub list_indent: String,
    pub in_footnotes: bool,
    pub in_html_table: bool,
    pub in_markdown_table: bool,
    pub in_trait: bool,
    pub feature_type_depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub key: String,
    pub text: String,
}

impl Citation {
    /// Footer line in Markdown footnote syntax
    pub fn footer_line(&self) -> String {
        format!("[^{}]: {}", self.key, self.text)
    }
}

/// Ordered citation key → text entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationMap {
    entries: Vec<Citation>,
}

impl CitationMap {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.text.as_str())
    }

    /// Insert a citation. The first text registered for a key wins.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        if self.get(&key).is_none() {
            self.entries.push(Citation {
                key,
                text: text.into(),
            });
        }
    }

    /// Drain every citation as footer lines, in insertion order.
    pub fn flush(&mut self) -> Vec<String> {
        self.drain().iter().map(Citation::footer_line).collect()
    }

    fn drain(&mut self) -> Vec<Citation> {
        std::mem::take(&mut self.entries)
    }
}

/// Stack of rendering frames plus the citations gathered under them
#[derive(Debug, Clone, Default)]
pub struct ParseState {
    stack: Vec<ParseFrame>,
    base: ParseFrame,
    citations: CitationMap,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The top frame, or the default frame when the stack is empty
    pub fn current(&self) -> &ParseFrame {
        self.stack.last().unwrap_or(&self.base)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push_with(&mut self, change: impl FnOnce(&mut ParseFrame)) -> bool {
        let mut next = self.current().clone();
        change(&mut next);
        if &next == self.current() {
            return false;
        }
        self.stack.push(next);
        true
    }

    pub fn push_source(&mut self, source: Option<&str>, page: u32) -> bool {
        self.push_with(|frame| {
            frame.source = source.map(str::to_string);
            frame.page = page;
        })
    }

    pub fn push_footnotes(&mut self, in_footnotes: bool) -> bool {
        self.push_with(|frame| frame.in_footnotes = in_footnotes)
    }

    pub fn push_html_table(&mut self, in_html_table: bool) -> bool {
        self.push_with(|frame| frame.in_html_table = in_html_table)
    }

    pub fn push_markdown_table(&mut self, in_markdown_table: bool) -> bool {
        self.push_with(|frame| frame.in_markdown_table = in_markdown_table)
    }

    pub fn push_list_indent(&mut self, indent: &str) -> bool {
        self.push_with(|frame| frame.list_indent = indent.to_string())
    }

    pub fn push_trait(&mut self, in_trait: bool) -> bool {
        self.push_with(|frame| frame.in_trait = in_trait)
    }

    pub fn push_feature_type_depth(&mut self, depth: u32) -> bool {
        self.push_with(|frame| frame.feature_type_depth = depth)
    }

    /// Remove the frame created by a push that returned `pushed`.
    ///
    /// Leaving the last frame with citations pending drains them into the error.
    pub fn pop(&mut self, pushed: bool) -> Result<(), ContextError> {
        if !pushed {
            return Ok(());
        }
        if self.stack.pop().is_none() {
            return Err(ContextError::UnbalancedPop);
        }
        if self.stack.is_empty() && !self.citations.is_empty() {
            return Err(ContextError::UnresolvedCitations(self.citations.drain()));
        }
        Ok(())
    }

    /// Register a citation under the active frame.
    pub fn add_citation(
        &mut self,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), ContextError> {
        let key = key.into();
        if self.stack.is_empty() {
            return Err(ContextError::NoActiveFrame(key));
        }
        self.citations.insert(key, text);
        Ok(())
    }

    pub fn citations(&self) -> &CitationMap {
        &self.citations
    }

    /// Drain pending citations as `[^key]: text` footer lines.
    pub fn flush_citations(&mut self) -> Vec<String> {
        self.citations.flush()
    }

    /// `"PHB p. 12"`, or just the source when the page is unknown
    pub fn source_page(&self) -> Option<String> {
        let frame = self.current();
        let source = frame.source.as_deref()?;
        if frame.page > 0 {
            Some(format!("{source} p. {}", frame.page))
        } else {
            Some(source.to_string())
        }
    }
}

//! Embedded markup rewriting for game-content text
//!
//!     Content records carry free-form prose with a private inline tag syntax, for example
//!     `{@dice 2d6 + 3}`, `{@hit +7}` or `{@scaledamage 8d6|3-9|1d6}`. This crate resolves those
//!     tags into Markdown for a note-taking application, including the exact `dice:` marker
//!     syntax consumed by the dice roller plugin.
//!
//!     This is a pure lib: no code here assumes a shell environment (stdout, env vars, files).
//!     Warnings are collected into a [`Diagnostics`] sink owned by the renderer and mirrored to
//!     the `log` facade, so callers without a logger still see every problem.
//!
//! Architecture
//!
//!     .
//!     ├── error.rs          # ContextError / MarkupError
//!     ├── diagnostics.rs    # Diagnostic values and the collecting sink
//!     ├── options.rs        # RenderOptions, RollerMode
//!     ├── context.rs        # ParseFrame stack and citation map
//!     ├── tokenizer.rs      # Stack-of-buffers brace scanner
//!     ├── tags.rs           # Tag parsing and the non-dice tags
//!     ├── dice
//!     │   ├── mod.rs        # DiceFormulaState, code(), format_dice()
//!     │   ├── resolver.rs   # dice-family tag rules
//!     │   └── simplify.rs   # post-pass over rendered dice text
//!     ├── admonition.rs     # fence sizing and admonition wrapping
//!     └── renderer.rs       # TextRenderer: ties the pieces together
//!
//! Core Algorithm
//!
//!     Text flows through the tokenizer, which resolves the innermost `{@tag ...}` first and
//!     splices the result into its parent buffer. Tag resolution consults the top frame of the
//!     context stack: the same `{@hit +5}` renders as a roller marker in prose, as plain text in
//!     a statblock trait, and with escaped pipes inside a Markdown table. When any roller marker
//!     was produced, the simplifier collapses the "N (formula)" duplicates nested resolution
//!     leaves behind.
//!
//!     Nothing in this crate aborts a conversion. Malformed braces, unknown tags and broken
//!     admonitions are reported and rendered as literally as possible.

pub mod admonition;
pub mod context;
pub mod diagnostics;
pub mod dice;
pub mod error;
pub mod options;
pub mod renderer;
pub mod tags;
pub mod tokenizer;

pub use admonition::{balance_backticks, nested_embed, wrap_admonition, RenderedAdmonition};
pub use context::{CitationMap, ParseFrame, ParseState};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use dice::DiceFormulaState;
pub use error::{ContextError, MarkupError};
pub use options::{RenderOptions, RollerMode};
pub use renderer::TextRenderer;

/// Renders a single text unit with a fresh renderer.
///
/// Convenience for callers that have no surrounding context to track. Returns the
/// Markdown together with every diagnostic raised while rendering.
pub fn render_text(input: &str, options: RenderOptions) -> (String, Vec<Diagnostic>) {
    let mut renderer = TextRenderer::new(options);
    let output = renderer.replace_text(input);
    (output, renderer.take_diagnostics())
}

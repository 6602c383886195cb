//! Document-level commands
//!
//! The renderer works on single text units. These helpers split a document into
//! paragraphs, render each one under the frames requested on the command line, and
//! assemble the footer lines and source citation that belong at the end.

use serde::Serialize;
use tome_markup::dice::DICE_TAGS;
use tome_markup::tags::{FOOTNOTE_TAG, FORMATTING_TAGS};
use tome_markup::{wrap_admonition, Diagnostic, RenderOptions, TextRenderer};

/// Table kinds a rendered document can be placed in
pub const TABLE_KINDS: &[&str] = &["markdown", "html"];

/// Output formats of the render command
pub const OUTPUT_FORMATS: &[&str] = &["markdown", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Markdown,
    Html,
}

impl std::str::FromStr for TableKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "markdown" => Ok(TableKind::Markdown),
            "html" => Ok(TableKind::Html),
            other => Err(format!("Unknown table kind '{other}'")),
        }
    }
}

/// Frames the whole document is rendered under.
#[derive(Debug, Clone, Default)]
pub struct RenderSettings {
    /// Source id printed in the trailing citation line
    pub source: Option<String>,
    /// Fallback source frame used when `source` is absent, usually the file stem
    pub document: String,
    pub page: u32,
    pub table: Option<TableKind>,
    pub in_trait: bool,
    pub admonition: Option<String>,
}

/// Result of rendering one document.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub markdown: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == tome_markup::Severity::Error)
    }
}

/// Render a whole document.
///
/// Paragraphs are separated by blank lines and each one is a single text unit, so
/// tags may span lines inside a paragraph but never across one.
pub fn render_document(
    input: &str,
    options: RenderOptions,
    settings: &RenderSettings,
) -> RenderReport {
    let mut renderer = TextRenderer::new(options);

    let frame_source = settings
        .source
        .clone()
        .unwrap_or_else(|| settings.document.clone());
    let state = renderer.state_mut();
    let frames = [
        state.push_source(Some(&frame_source), settings.page),
        state.push_trait(settings.in_trait),
        state.push_markdown_table(settings.table == Some(TableKind::Markdown)),
        state.push_html_table(settings.table == Some(TableKind::Html)),
    ];

    let input = input.replace("\r\n", "\n");
    let mut lines: Vec<String> = Vec::new();
    for (index, paragraph) in input.trim_end_matches('\n').split("\n\n").enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        let rendered = renderer.replace_text(paragraph);
        lines.extend(rendered.lines().map(str::to_string));
    }

    let footnotes = renderer.flush_footnotes();
    if !footnotes.is_empty() {
        lines.push(String::new());
        lines.extend(footnotes);
    }
    if settings.source.is_some() {
        if let Some(citation) = renderer.source_page() {
            lines.push(String::new());
            lines.push(format!("_Source: {citation}_"));
        }
    }

    for pushed in frames.into_iter().rev() {
        renderer.pop(pushed);
    }

    if let Some(kind) = &settings.admonition {
        lines = wrap_admonition(lines, kind);
    }

    let mut markdown = lines.join("\n");
    if !markdown.is_empty() {
        markdown.push('\n');
    }
    RenderReport {
        markdown,
        diagnostics: renderer.take_diagnostics(),
    }
}

/// Rebalance an already-rendered note and indent it under a list item.
pub fn embed_document(input: &str, options: RenderOptions, indent: &str) -> RenderReport {
    let mut renderer = TextRenderer::new(options);
    let lines: Vec<&str> = input.lines().collect();
    let embedded = renderer.with_list_indent(indent, |r| r.embed_note(&lines));

    let mut markdown = embedded.join("\n");
    if !markdown.is_empty() {
        markdown.push('\n');
    }
    RenderReport {
        markdown,
        diagnostics: renderer.take_diagnostics(),
    }
}

/// Every tag name the renderer resolves, grouped the way `--list-tags` prints them
pub fn known_tags() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("Dice", DICE_TAGS.to_vec()),
        ("Citations", vec![FOOTNOTE_TAG]),
        ("Formatting", FORMATTING_TAGS.to_vec()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_markup::{DiagnosticKind, RollerMode};

    fn settings() -> RenderSettings {
        RenderSettings {
            document: "doc".to_string(),
            ..RenderSettings::default()
        }
    }

    #[test]
    fn renders_paragraphs_independently() {
        let report = render_document(
            "Attack {@hit 3}.\n\nDamage {@damage 1d8}.\n",
            RenderOptions::default(),
            &settings(),
        );
        assert_eq!(report.markdown, "Attack `+3`.\n\nDamage `1d8`.\n");
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn crlf_input_splits_into_paragraphs() {
        let report = render_document(
            "Attack {@hit 3}.\r\n\r\nDamage {@damage 1d8}.\r\n",
            RenderOptions::default(),
            &settings(),
        );
        assert_eq!(report.markdown, "Attack `+3`.\n\nDamage `1d8`.\n");
    }

    #[test]
    fn tags_may_span_lines_within_a_paragraph() {
        let report = render_document(
            "{@b bold\ntext}",
            RenderOptions::default(),
            &settings(),
        );
        assert_eq!(report.markdown, "**bold\ntext**\n");
    }

    #[test]
    fn footnotes_collect_at_the_end() {
        let report = render_document(
            "Wolf{@footnote *|Pack tactics.}\n\nBear{@footnote †|Keen smell.|bear}",
            RenderOptions::default(),
            &settings(),
        );
        assert_eq!(
            report.markdown,
            "Wolf*[^1]\n\nBear†[^bear]\n\n[^1]: Pack tactics.\n[^bear]: Keen smell.\n"
        );
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn source_line_only_for_explicit_source() {
        let explicit = RenderSettings {
            source: Some("MM".to_string()),
            page: 42,
            ..settings()
        };
        let report = render_document("Text", RenderOptions::default(), &explicit);
        assert_eq!(report.markdown, "Text\n\n_Source: MM p. 42_\n");

        let report = render_document("Text", RenderOptions::default(), &settings());
        assert_eq!(report.markdown, "Text\n");
    }

    #[test]
    fn markdown_table_escapes_pipes() {
        let table = RenderSettings {
            table: Some(TableKind::Markdown),
            ..settings()
        };
        let report = render_document(
            "{@damage 2d4}",
            RenderOptions::with_roller(RollerMode::Enabled),
            &table,
        );
        assert_eq!(report.markdown, "`dice:2d4\\|noform\\|avg` (`2d4`)\n");
    }

    #[test]
    fn html_table_switches_formatting() {
        let table = RenderSettings {
            table: Some(TableKind::Html),
            ..settings()
        };
        let report = render_document("{@i quietly}", RenderOptions::default(), &table);
        assert_eq!(report.markdown, "<i>quietly</i>\n");
    }

    #[test]
    fn trait_in_yaml_suppresses_markers() {
        let in_trait = RenderSettings {
            in_trait: true,
            admonition: Some("statblock".to_string()),
            ..settings()
        };
        let report = render_document(
            "{@hit 5}",
            RenderOptions::with_roller(RollerMode::EnabledUsingFs),
            &in_trait,
        );
        assert_eq!(report.markdown, "```ad-statblock\n+5\n```\n");
    }

    #[test]
    fn unknown_tag_is_reported_not_fatal() {
        let report = render_document("{@spell fireball}", RenderOptions::default(), &settings());
        assert_eq!(report.markdown, "fireball\n");
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::UnknownTag);
        assert!(!report.has_errors());
    }

    #[test]
    fn embed_lengthens_outer_fence_and_indents() {
        let note = "```ad-note\n```yaml\nname: Goblin\n```\n```\n";
        let report = embed_document(note, RenderOptions::default(), "  ");
        assert_eq!(
            report.markdown,
            "  ````ad-note\n  ```yaml\n  name: Goblin\n  ```\n  ````\n"
        );
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn embed_reports_malformed_note() {
        let report = embed_document("just text\n", RenderOptions::default(), "  ");
        assert_eq!(report.markdown, "  just text\n");
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::MalformedAdmonition);
    }

    #[test]
    fn known_tags_cover_every_family() {
        let tags = known_tags();
        let names: Vec<&str> = tags.iter().flat_map(|(_, names)| names.clone()).collect();
        assert!(names.contains(&"hit"));
        assert!(names.contains(&"footnote"));
        assert!(names.contains(&"bold"));
    }
}

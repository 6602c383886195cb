//! Property tests for the invariants the renderer promises.

use proptest::prelude::*;
use tome_markup::dice::{format_dice, simplify_dice_text};
use tome_markup::{
    nested_embed, DiceFormulaState, ParseFrame, ParseState, RenderOptions, RollerMode,
    TextRenderer,
};

#[derive(Debug, Clone)]
enum Op {
    Source(Option<String>, u32),
    Footnotes(bool),
    HtmlTable(bool),
    MarkdownTable(bool),
    ListIndent(String),
    Trait(bool),
    FeatureDepth(u32),
    Pop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (
            proptest::option::of(prop_oneof![Just("PHB"), Just("MM"), Just("DMG")]),
            0u32..3
        )
            .prop_map(|(s, p)| Op::Source(s.map(str::to_string), p)),
        any::<bool>().prop_map(Op::Footnotes),
        any::<bool>().prop_map(Op::HtmlTable),
        any::<bool>().prop_map(Op::MarkdownTable),
        prop_oneof![Just(""), Just("  "), Just("    ")].prop_map(|s| Op::ListIndent(s.to_string())),
        any::<bool>().prop_map(Op::Trait),
        (0u32..3).prop_map(Op::FeatureDepth),
        Just(Op::Pop),
        Just(Op::Pop),
    ]
}

fn roll_strategy() -> impl Strategy<Value = String> {
    (1u32..10, prop_oneof![Just(4u32), Just(6), Just(8), Just(10), Just(12)], 0i32..8)
        .prop_map(|(count, faces, bonus)| {
            if bonus == 0 {
                format!("{count}d{faces}")
            } else {
                format!("{count}d{faces} + {bonus}")
            }
        })
}

fn has_unescaped_pipe(text: &str) -> bool {
    let mut previous = None;
    for c in text.chars() {
        if c == '|' && previous != Some('\\') {
            return true;
        }
        previous = Some(c);
    }
    false
}

proptest! {
    #[test]
    fn push_pop_matches_reference_stack(ops in proptest::collection::vec(op_strategy(), 0..60)) {
        let mut state = ParseState::new();
        let mut reference: Vec<ParseFrame> = Vec::new();
        let mut pushes: Vec<bool> = Vec::new();

        for op in ops {
            let before = state.current().clone();
            let pushed = match op {
                Op::Pop => {
                    if let Some(pushed) = pushes.pop() {
                        prop_assert!(state.pop(pushed).is_ok());
                        if pushed {
                            reference.pop();
                        }
                    }
                    let expected = reference.last().cloned().unwrap_or_default();
                    prop_assert_eq!(state.current(), &expected);
                    continue;
                }
                Op::Source(source, page) => state.push_source(source.as_deref(), page),
                Op::Footnotes(v) => state.push_footnotes(v),
                Op::HtmlTable(v) => state.push_html_table(v),
                Op::MarkdownTable(v) => state.push_markdown_table(v),
                Op::ListIndent(indent) => state.push_list_indent(&indent),
                Op::Trait(v) => state.push_trait(v),
                Op::FeatureDepth(depth) => state.push_feature_type_depth(depth),
            };
            if pushed {
                prop_assert_ne!(state.current(), &before);
                reference.push(state.current().clone());
            } else {
                prop_assert_eq!(state.current(), &before);
            }
            pushes.push(pushed);
            prop_assert_eq!(state.depth(), reference.len());
        }

        while let Some(pushed) = pushes.pop() {
            prop_assert!(state.pop(pushed).is_ok());
        }
        prop_assert_eq!(state.depth(), 0);
        prop_assert_eq!(state.current(), &ParseFrame::default());
    }

    #[test]
    fn roller_marker_iff_roller_active(roll in roll_strategy(), average in any::<bool>(), append in any::<bool>()) {
        let frame = ParseFrame::default();
        let disabled = DiceFormulaState::new(RollerMode::Disabled, &frame);
        let enabled = DiceFormulaState::new(RollerMode::Enabled, &frame);

        let plain = format_dice(&roll, Some("label"), disabled, average, append);
        let marked = format_dice(&roll, Some("label"), enabled, average, append);
        prop_assert!(!plain.contains("`dice:"));
        prop_assert!(marked.contains("`dice:"));
    }

    #[test]
    fn table_output_has_no_bare_pipes(
        roll in roll_strategy(),
        bonus in 0i32..10,
        prose in 0u32..40,
    ) {
        let mut renderer = TextRenderer::new(RenderOptions::with_roller(RollerMode::Enabled));
        let input = format!("{prose} ({{@damage {roll}}}) and {{@hit {bonus}}} or {{@dice {roll};1d4}}");
        let output = renderer.with_markdown_table(|r| r.replace_text(&input));
        prop_assert!(!has_unescaped_pipe(&output), "bare pipe in {}", output);
    }

    #[test]
    fn simplify_is_idempotent(roll in roll_strategy(), prose in 0u32..40, table in any::<bool>()) {
        let mut renderer = TextRenderer::new(RenderOptions::with_roller(RollerMode::Enabled));
        let input = format!("Hit: {prose} ({{@damage {roll}}}) and {prose} ({{@hit {prose}}})");
        let once = if table {
            renderer.with_markdown_table(|r| r.replace_text(&input))
        } else {
            renderer.replace_text(&input)
        };
        prop_assert_eq!(simplify_dice_text(&once, table), once);
    }

    #[test]
    fn fence_exceeds_inner_backtick_runs(
        k in 1usize..20,
        before in proptest::collection::vec("[a-z ]{0,12}", 0..5),
        after in proptest::collection::vec("[a-z ]{0,12}", 0..5),
    ) {
        let mut lines = before;
        lines.push("`".repeat(k));
        lines.extend(after);
        let fence = nested_embed(&lines);
        prop_assert!(fence.len() > k);
        prop_assert!(fence.len() >= 3);
    }
}

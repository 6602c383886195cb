use tome_markup::dice::simplify_dice_text;
use tome_markup::{nested_embed, render_text, DiagnosticKind, RenderOptions, RollerMode};

fn render(input: &str, roller: RollerMode) -> String {
    let (output, diagnostics) = render_text(input, RenderOptions::with_roller(roller));
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    output
}

#[test]
fn test_hit_without_roller() {
    assert_eq!(render("{@hit +7}", RollerMode::Disabled), "`+7`");
}

#[test]
fn test_hit_with_roller() {
    assert_eq!(
        render("{@hit +7}", RollerMode::Enabled),
        "`dice:1d20+7|noform|text(+7)`"
    );
}

#[test]
fn test_d20_with_skill_name() {
    assert_eq!(
        render("{@d20 2|+2|Perception}", RollerMode::Disabled),
        "Perception (`+2`)"
    );
}

#[test]
fn test_dice_alternatives() {
    assert_eq!(
        render("{@dice 1d6;2d6}", RollerMode::Enabled),
        "`dice:1d6|noform|avg` or `dice:2d6|noform|avg`"
    );
}

#[test]
fn test_simplify_repeated_number() {
    assert_eq!(
        simplify_dice_text("26 (`dice:1d20+8|noform|text(+8)`)", false),
        "`dice:1d20+8|noform|text(26)` (`+8`)"
    );
}

#[test]
fn test_nested_embed_fence() {
    assert_eq!(nested_embed(&["```", "some text"]).len(), 4);
}

#[test]
fn test_prose_number_moves_into_marker() {
    assert_eq!(
        render("an attack bonus of 26 ({@hit 8})", RollerMode::Enabled),
        "an attack bonus of `dice:1d20+8|noform|text(26)` (`+8`)"
    );
}

#[test]
fn test_average_collapses_into_label() {
    assert_eq!(
        render("Hit: 7 ({@damage 1d6 + 4}) piercing", RollerMode::Enabled),
        "Hit: `dice:1d6+4|noform|avg|text(7)` (`1d6 + 4`) piercing"
    );
}

#[test]
fn test_average_kept_for_spell_progression() {
    assert_eq!(
        render(
            "increases by 4 ({@damage 1d8}) when you reach levels 5 and 11",
            RollerMode::Enabled
        ),
        "increases by 4 (`dice:1d8|noform|avg` (`1d8`)) when you reach levels 5 and 11"
    );
}

#[test]
fn test_rendering_twice_changes_nothing() {
    let once = render("Hit: 7 ({@damage 1d6 + 4}) piercing", RollerMode::Enabled);
    assert_eq!(render(&once, RollerMode::Enabled), once);
}

#[test]
fn test_dice_inside_formatting_tag() {
    assert_eq!(
        render("{@b {@damage 2d6}}", RollerMode::Disabled),
        "**`2d6`**"
    );
}

#[test]
fn test_footnote_with_nested_dice_keeps_parts() {
    let (output, diagnostics) = render_text(
        "{@footnote {@damage 1d6} extra|only at night}",
        RenderOptions::with_roller(RollerMode::Enabled),
    );
    assert_eq!(output, "`dice:1d6|noform|avg` (`1d6`) extra (only at night)");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::CitationWithoutFrame);
}

#[test]
fn test_malformed_braces_do_not_abort() {
    let (output, diagnostics) = render_text(
        "a} {@hit 3} {open",
        RenderOptions::with_roller(RollerMode::Disabled),
    );
    assert_eq!(output, "a} `+3` {open");
    let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::MismatchedBrace, DiagnosticKind::UnclosedBrace]
    );
}

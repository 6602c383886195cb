//! A statblock-like passage rendered through every context the renderer tracks.

use insta::assert_snapshot;
use tome_markup::{wrap_admonition, RenderOptions, RollerMode, TextRenderer};

fn render_goblin(roller: RollerMode) -> (String, TextRenderer) {
    let mut renderer = TextRenderer::new(RenderOptions::with_roller(roller));
    let lines = renderer.with_source(Some("MM"), 166, |r| {
        let mut lines = vec![r.heading("Goblin")];
        lines.push(r.replace_text(
            "Melee Weapon Attack: {@hit 4} to hit. Hit: 5 ({@damage 1d6 + 2}) slashing damage.",
        ));
        let cell = r.with_markdown_table(|r| r.replace_text("{@dice 2d4}"));
        lines.push(format!("| 1 | {cell} |"));
        lines.push(r.replace_text("Sneaky{@footnote *|Goblins hide in the dark.}"));
        lines.extend(r.flush_footnotes());
        if let Some(source) = r.source_page() {
            lines.push(format!("_Source: {source}_"));
        }
        lines
    });
    (lines.join("\n"), renderer)
}

#[test]
fn test_goblin_with_roller() {
    let (output, renderer) = render_goblin(RollerMode::Enabled);
    assert!(renderer.diagnostics().is_empty());
    assert_snapshot!(output, @r"
    # Goblin
    Melee Weapon Attack: `dice:1d20+4|noform|text(+4)` to hit. Hit: `dice:1d6+2|noform|avg|text(5)` (`1d6 + 2`) slashing damage.
    | 1 | `dice:2d4\|noform\|avg` (`2d4`) |
    Sneaky*[^1]
    [^1]: Goblins hide in the dark.
    _Source: MM p. 166_
    ");
}

#[test]
fn test_goblin_without_roller() {
    let (output, renderer) = render_goblin(RollerMode::Disabled);
    assert!(renderer.diagnostics().is_empty());
    assert_snapshot!(output, @r"
    # Goblin
    Melee Weapon Attack: `+4` to hit. Hit: 5 (`1d6 + 2`) slashing damage.
    | 1 | `2d4` |
    Sneaky*[^1]
    [^1]: Goblins hide in the dark.
    _Source: MM p. 166_
    ");
}

#[test]
fn test_trait_inside_admonition() {
    let mut renderer = TextRenderer::new(RenderOptions::with_roller(RollerMode::EnabledUsingFs));
    let body = renderer.with_trait(|r| {
        vec![
            "```yaml".to_string(),
            r.replace_text("desc: Melee {@hit 4} to hit, {@damage 1d6 + 2} damage"),
            "```".to_string(),
        ]
    });
    let output = wrap_admonition(body, "statblock").join("\n");
    assert_snapshot!(output, @r"
    ````ad-statblock
    ```yaml
    desc: Melee +4 to hit, 1d6 + 2 damage
    ```
    ````
    ");
}

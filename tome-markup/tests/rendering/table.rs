use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use tome_markup::{RenderOptions, RollerMode, TextRenderer};

fn table_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options
}

/// Cells of each row, as the concatenated code literals they contain
fn code_cells<'a>(root: &'a AstNode<'a>) -> Vec<Vec<String>> {
    root.descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::TableRow(_)))
        .map(|row| {
            row.children()
                .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
                .map(|cell| {
                    cell.descendants()
                        .filter_map(|n| match &n.data.borrow().value {
                            NodeValue::Code(code) => Some(code.literal.clone()),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_roller_markers_survive_table_parsing() {
    let mut renderer = TextRenderer::new(RenderOptions::with_roller(RollerMode::Enabled));
    let cell = renderer.with_markdown_table(|r| r.replace_text("{@damage 1d6}"));
    assert_eq!(cell, "`dice:1d6\\|noform\\|avg` (`1d6`)");

    let md = format!("| d6 | Damage |\n| --- | --- |\n| 1 | {cell} |\n");
    let arena = Arena::new();
    let root = parse_document(&arena, &md, &table_options());

    let rows = code_cells(root);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].len(), 2);
    assert_eq!(rows[1][1], "dice:1d6|noform|avg 1d6");
}

#[test]
fn test_table_frame_is_scoped() {
    let mut renderer = TextRenderer::new(RenderOptions::with_roller(RollerMode::Enabled));
    let inside = renderer.with_markdown_table(|r| r.replace_text("{@hit 2}"));
    let outside = renderer.replace_text("{@hit 2}");

    assert_eq!(inside, "`dice:1d20+2\\|noform\\|text(+2)`");
    assert_eq!(outside, "`dice:1d20+2|noform|text(+2)`");
    assert_eq!(renderer.state().depth(), 0);
}

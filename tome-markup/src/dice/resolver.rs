//! Resolution rules for the dice-family tags
//!
//! Every tag here forwards to [`format_dice`]; the rules only differ in how the tag's
//! `|`-separated parts become a roll expression and a display label.

use super::{code, format_dice, DiceFormulaState};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::tags::Tag;

pub const DICE_TAGS: &[&str] = &[
    "dice",
    "autodice",
    "damage",
    "h",
    "hit",
    "d20",
    "initiative",
    "scaledice",
    "scaledamage",
];

const D20: &str = "1d20";

pub fn is_dice_tag(name: &str) -> bool {
    DICE_TAGS.contains(&name)
}

pub fn resolve_dice_tag(
    tag: &Tag,
    state: DiceFormulaState,
    diagnostics: &mut Diagnostics,
) -> String {
    let parts = tag.parts();
    let roll = parts.first().map(|p| p.trim()).unwrap_or_default();
    if roll.is_empty() {
        diagnostics.warn(
            DiagnosticKind::BadTagFormat,
            format!("Missing roll expression in {}", tag.source()),
        );
        return String::new();
    }

    match tag.name.as_str() {
        "d20" | "h" | "hit" | "initiative" => resolve_d20(tag, &parts, state),
        "scaledice" | "scaledamage" => resolve_scaled(tag, &parts, state, diagnostics),
        _ => resolve_roll(&parts, state),
    }
}

/// `2` → `+2`; signed modifiers and full `1d20...` formulas are left alone
fn signed_modifier(expr: &str) -> String {
    let expr = expr.trim();
    if !expr.starts_with(D20) && expr.starts_with(|c: char| c.is_ascii_digit()) {
        format!("+{expr}")
    } else {
        expr.to_string()
    }
}

fn resolve_d20(tag: &Tag, parts: &[&str], state: DiceFormulaState) -> String {
    let modifier = signed_modifier(parts[0]);
    let formula = if modifier.starts_with(D20) {
        modifier.clone()
    } else {
        format!("{D20}{modifier}")
    };
    let display = parts.get(1).map(|p| p.trim()).filter(|p| !p.is_empty());

    if let Some(name) = parts.get(2).map(|p| p.trim()).filter(|p| !p.is_empty()) {
        let label = code(display.unwrap_or(modifier.as_str()), state);
        let rendered = format_dice(&formula, Some(&label), state, false, false);
        return format!("{name} ({rendered})");
    }

    let rendered = format_dice(&formula, Some(&code(&formula, state)), state, false, false);
    match display {
        Some(text) if tag.name == "hit" => text.to_string(),
        Some(text) => format!("{rendered} ({})", code(text, state)),
        None => rendered,
    }
}

fn resolve_scaled(
    tag: &Tag,
    parts: &[&str],
    state: DiceFormulaState,
    diagnostics: &mut Diagnostics,
) -> String {
    let Some(addend) = parts.get(2).map(|p| p.trim()).filter(|p| !p.is_empty()) else {
        diagnostics.warn(
            DiagnosticKind::BadTagFormat,
            format!("Missing per-step addend in {}", tag.source()),
        );
        let roll = parts[0].trim();
        return format_dice(roll, Some(&code(roll, state)), state, false, false);
    };

    match parts.get(4).map(|p| p.trim()).filter(|p| !p.is_empty()) {
        Some(display) => format_dice(addend, Some(display), state, false, true),
        None => format_dice(addend, Some(&code(addend, state)), state, false, false),
    }
}

fn resolve_roll(parts: &[&str], state: DiceFormulaState) -> String {
    let roll = parts[0].trim();
    let mut display = parts
        .get(1)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    if display.is_none() && roll.contains(';') {
        let alternatives: Vec<String> = roll
            .split(';')
            .map(str::trim)
            .filter(|alt| !alt.is_empty())
            .map(|alt| format_dice(alt, None, state, true, false))
            .collect();
        display = Some(alternatives.join(" or "));
    }

    format_dice(roll, display.as_deref(), state, true, true)
}

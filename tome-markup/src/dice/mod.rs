//! Dice formula rendering
//!
//! A roll expression renders one of three ways, decided by [`DiceFormulaState`]:
//!
//! | State                          | `{@damage 2d6 + 3}` renders as                    |
//! |--------------------------------|---------------------------------------------------|
//! | roller disabled                | `` `2d6 + 3` ``                                   |
//! | roller enabled                 | `` `dice:2d6+3|noform|avg` (`2d6 + 3`) ``         |
//! | statblock trait, FS roller     | `2d6 + 3` (no decoration at all)                  |
//!
//! The marker shape `` `dice:<formula>|noform[|avg][|text(<label>)]` `` is consumed by the
//! dice roller plugin and must be reproduced exactly, flag order included.

pub mod resolver;
pub mod simplify;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::ParseFrame;
use crate::options::RollerMode;

pub use resolver::{is_dice_tag, resolve_dice_tag, DICE_TAGS};
pub use simplify::simplify_dice_text;

/// Only digits, `d`, spaces, `+` and `-`
static DICE_FORMULA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9d +\-]+$").unwrap());

/// Residue of an upstream input-prompt substitution
static PROMPT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(<span[^>]*>)([^<]*)(</span>)").unwrap());

const SUMMON_SPELL_LEVEL: (&str, &str) = ("summonSpellLevel", "the spell's level");
const SUMMON_CLASS_LEVEL: (&str, &str) = ("summonClassLevel", "your class level");

/// Derived from the current frame and the roller mode; never cached across a push or pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceFormulaState {
    pub roller: RollerMode,
    pub suppress_in_yaml: bool,
}

impl DiceFormulaState {
    pub fn new(roller: RollerMode, frame: &ParseFrame) -> Self {
        DiceFormulaState {
            roller,
            suppress_in_yaml: frame.in_trait && roller == RollerMode::EnabledUsingFs,
        }
    }

    pub fn no_roller(&self) -> bool {
        self.roller == RollerMode::Disabled || self.suppress_in_yaml
    }

    /// Statblock YAML forbids any Markdown decoration
    pub fn plain_text(&self) -> bool {
        self.suppress_in_yaml
    }
}

/// Code-format `text`, dropping the implicit `1d20`.
///
/// Text that already carries a prompt span with its own code formatting is returned bare;
/// wrapping it again would nest backticks.
pub fn code(text: &str, state: DiceFormulaState) -> String {
    let stripped = text.replace("1d20", "");
    let stripped = stripped.trim();
    if state.plain_text() || stripped.contains("<span") {
        stripped.to_string()
    } else {
        format!("`{stripped}`")
    }
}

pub fn is_dice_formula(roll: &str) -> bool {
    DICE_FORMULA.is_match(roll)
}

/// Render a roll expression.
///
/// `display` is the label shown in place of the formula; `use_average` adds the `avg` flag
/// to roller markers; `append_formula` follows the rendering with ` (<formula>)`.
pub fn format_dice(
    roll: &str,
    display: Option<&str>,
    state: DiceFormulaState,
    use_average: bool,
    append_formula: bool,
) -> String {
    if roll.contains(';') {
        return display.unwrap_or(roll).to_string();
    }

    let mut roll = roll.to_string();
    let mut display = display.map(str::to_string);

    if roll.contains("<span") {
        roll = PROMPT_SPAN
            .replace_all(&roll, |caps: &regex::Captures| {
                format!("{}{}{}", &caps[1], code(&caps[2], state), &caps[3])
            })
            .into_owned();
    }

    for (placeholder, prose) in [SUMMON_SPELL_LEVEL, SUMMON_CLASS_LEVEL] {
        if let Some(index) = roll.find(placeholder) {
            if display.is_none() {
                let prefix = roll[..index].trim();
                let suffix = roll[index + placeholder.len()..].trim();
                let mut label = String::new();
                if !prefix.is_empty() {
                    label.push_str(&code(prefix, state));
                    label.push(' ');
                }
                label.push_str(prose);
                if !suffix.is_empty() {
                    label.push(' ');
                    label.push_str(suffix);
                }
                display = Some(label);
            }
            roll = roll.replace(placeholder, prose);
        }
    }

    let dice = code(&roll, state);

    if !is_dice_formula(&roll) {
        return display.unwrap_or(dice);
    }

    if state.no_roller() {
        return match display {
            None => dice,
            Some(text) if append_formula => format!("{text} ({dice})"),
            Some(text) => text,
        };
    }

    let marker = roller_marker(&roll, display.as_deref(), use_average);
    if append_formula {
        format!("{marker} ({dice})")
    } else {
        marker
    }
}

/// `` `dice:<formula>|noform[|avg][|text(<label>)]` ``
pub fn roller_marker(roll: &str, display: Option<&str>, use_average: bool) -> String {
    if display.is_none() && !use_average {
        return format!("`dice: {}`", roll.trim());
    }
    let mut marker = String::from("`dice:");
    marker.push_str(&roll.replace(' ', ""));
    marker.push_str("|noform");
    if use_average {
        marker.push_str("|avg");
    }
    if let Some(text) = display {
        marker.push_str("|text(");
        marker.push_str(&text.replace('`', ""));
        marker.push(')');
    }
    marker.push('`');
    marker
}

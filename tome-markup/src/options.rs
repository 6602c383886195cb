use serde::{Deserialize, Serialize};

/// How dice expressions are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollerMode {
    /// Plain code-formatted formulas
    #[default]
    Disabled,
    /// Dice roller plugin markers
    Enabled,
    /// Roller markers, except inside statblock traits that are embedded as YAML
    EnabledUsingFs,
}

impl RollerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RollerMode::Disabled => "disabled",
            RollerMode::Enabled => "enabled",
            RollerMode::EnabledUsingFs => "enabled-using-fs",
        }
    }
}

impl std::str::FromStr for RollerMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "disabled" => Ok(RollerMode::Disabled),
            "enabled" => Ok(RollerMode::Enabled),
            "enabled-using-fs" => Ok(RollerMode::EnabledUsingFs),
            other => Err(format!("Unknown roller mode '{other}'")),
        }
    }
}

/// Configuration for the markup renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Dice roller integration
    pub roller: RollerMode,

    /// Indentation added for each nested list level
    pub list_indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            roller: RollerMode::Disabled,
            list_indent: "    ".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_roller(roller: RollerMode) -> Self {
        Self {
            roller,
            ..Self::default()
        }
    }
}

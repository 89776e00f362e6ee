//! Authoritative visual parameters for the loaded structure.
//!
//! [`ViewState`] is the single source of truth the synchronizer reads and
//! the interpreter updates. Serialized names use the external vocabulary
//! (kebab-case enum members, camelCase field keys) so the same spelling
//! works for presets, the UI schema, and the language-service contract.
//! Presets serialize to/from TOML in the same way viewer options do.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Rendering style applied to the polymer component.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReprStyle {
    /// Secondary-structure cartoon.
    #[default]
    Cartoon,
    /// Molecular surface.
    Surface,
    /// Ball-and-stick atoms and bonds.
    BallAndStick,
    /// Van der Waals spheres.
    Spacefill,
    /// B-factor-scaled tube.
    Putty,
    /// Bonds only.
    Wireframe,
}

impl ReprStyle {
    /// All styles, in UI order.
    pub const ALL: [Self; 6] = [
        Self::Cartoon,
        Self::Surface,
        Self::BallAndStick,
        Self::Spacefill,
        Self::Putty,
        Self::Wireframe,
    ];

    /// The serialized (kebab-case) name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cartoon => "cartoon",
            Self::Surface => "surface",
            Self::BallAndStick => "ball-and-stick",
            Self::Spacefill => "spacefill",
            Self::Putty => "putty",
            Self::Wireframe => "wireframe",
        }
    }
}

/// How the polymer component is colored.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    /// Each chain gets a distinct color.
    #[default]
    ChainId,
    /// CPK element colors.
    ElementSymbol,
    /// Color by residue name.
    ResidueName,
    /// Color by hydrophobicity.
    Hydrophobicity,
    /// A single user-chosen tint (see [`ViewState::tint`]).
    Uniform,
}

impl ColorMode {
    /// All color modes, in UI order.
    pub const ALL: [Self; 5] = [
        Self::ChainId,
        Self::ElementSymbol,
        Self::ResidueName,
        Self::Hydrophobicity,
        Self::Uniform,
    ];

    /// The serialized (kebab-case) name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChainId => "chain-id",
            Self::ElementSymbol => "element-symbol",
            Self::ResidueName => "residue-name",
            Self::Hydrophobicity => "hydrophobicity",
            Self::Uniform => "uniform",
        }
    }
}

/// A validated `#rrggbb` color.
///
/// Parsing is the only way to construct a `Tint` from user or service
/// input, so an ill-formed encoding can never reach the engine adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tint(u32);

impl Tint {
    /// The packed `0xRRGGBB` value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self(0x004f_46e5)
    }
}

impl FromStr for Tint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        // from_str_radix tolerates a leading `+`, so check digits first
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::BadColor(format!(
                "expected 6 hex digits, got {s:?}"
            )));
        }
        u32::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|_| ParseError::BadColor(format!("not hex: {s:?}")))
    }
}

impl TryFrom<String> for Tint {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Tint> for String {
    fn from(t: Tint) -> Self {
        t.to_string()
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// The authoritative set of user-facing visual parameters.
///
/// Owned by the orchestration shell (see [`crate::session::Session`]),
/// read by the synchronizer, and updated either by direct UI edits or by
/// validated interpreter output. All fields have serde defaults so a
/// partial preset file works.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewState {
    /// Polymer rendering style.
    #[schemars(title = "Style")]
    pub style: ReprStyle,
    /// Polymer coloring strategy.
    #[schemars(title = "Coloring")]
    pub color_mode: ColorMode,
    /// Custom color, used only when `color_mode` is `uniform`.
    #[schemars(title = "Tint", with = "String")]
    pub tint: Tint,
    /// Whether water molecules are shown.
    #[schemars(title = "Show Water")]
    pub show_water: bool,
    /// Whether hetero atoms (ligands, cofactors) are shown.
    #[schemars(title = "Show Hetero Atoms")]
    pub show_hetero: bool,
    /// Identifier of the structure resident in the engine, if any.
    /// Transient; never persisted in presets.
    #[serde(skip)]
    #[schemars(skip)]
    pub structure_id: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            style: ReprStyle::Cartoon,
            color_mode: ColorMode::ChainId,
            tint: Tint::default(),
            show_water: false,
            show_hetero: true,
            structure_id: None,
        }
    }
}

impl ViewState {
    /// Merge a validated partial update, field by field.
    pub fn apply(&mut self, update: &StateUpdate) {
        if let Some(style) = update.style {
            self.style = style;
        }
        if let Some(color_mode) = update.color_mode {
            self.color_mode = color_mode;
        }
        if let Some(tint) = update.tint {
            self.tint = tint;
        }
        if let Some(show_water) = update.show_water {
            self.show_water = show_water;
        }
        if let Some(show_hetero) = update.show_hetero {
            self.show_hetero = show_hetero;
        }
    }

    /// Generate a JSON Schema describing the UI-exposed parameters.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ViewState)
    }

    /// Load a view preset from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ParseError::Preset(e.to_string()))
    }

    /// Save this state as a TOML view preset (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ParseError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ParseError::Preset(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(ParseError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

/// A validated partial [`ViewState`], produced by the interpreter or by
/// a single UI control edit. `None` fields are left untouched on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    /// New polymer style, if requested.
    pub style: Option<ReprStyle>,
    /// New coloring strategy, if requested.
    pub color_mode: Option<ColorMode>,
    /// New uniform tint, if requested.
    pub tint: Option<Tint>,
    /// New water visibility, if requested.
    pub show_water: Option<bool>,
    /// New hetero-atom visibility, if requested.
    pub show_hetero: Option<bool>,
}

impl StateUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.style.is_none()
            && self.color_mode.is_none()
            && self.tint.is_none()
            && self.show_water.is_none()
            && self.show_hetero.is_none()
    }
}

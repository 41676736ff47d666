//! Built-in and user-defined presets.
//!
//! A preset picks which segments appear on the primary row (left then
//! right), which are only eligible for the secondary row, the separator
//! drawn between them, per-segment options and a color scheme.

use crate::colors::{default_scheme, scheme_from_names, ColorScheme, ColorValue, NamedColorScheme, SemanticColor};
use crate::segments::SegmentId;
use crate::separators::SeparatorStyle;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ===== Segment options =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    /// Last directory component only
    #[default]
    Basename,
    /// Home-shortened and truncated to `max_length`
    Abbreviated,
    /// Home-shortened, never truncated
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    TwelveHour,
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Append the thinking level to the model name for reasoning models
    pub show_thinking_level: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            show_thinking_level: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    pub mode: PathMode,
    /// Column limit for [`PathMode::Abbreviated`]
    pub max_length: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            mode: PathMode::Basename,
            max_length: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitOptions {
    pub show_branch: bool,
    pub show_staged: bool,
    pub show_unstaged: bool,
    pub show_untracked: bool,
}

impl GitOptions {
    pub const fn all() -> Self {
        Self {
            show_branch: true,
            show_staged: true,
            show_unstaged: true,
            show_untracked: true,
        }
    }

    pub const fn branch_only() -> Self {
        Self {
            show_branch: true,
            show_staged: false,
            show_unstaged: false,
            show_untracked: false,
        }
    }

    pub const fn no_untracked() -> Self {
        Self {
            show_untracked: false,
            ..Self::all()
        }
    }
}

impl Default for GitOptions {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOptions {
    pub format: TimeFormat,
    pub show_seconds: bool,
}

/// Per-segment rendering options carried by a preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    pub model: ModelOptions,
    pub path: PathOptions,
    pub git: GitOptions,
    pub time: TimeOptions,
}

// ===== Presets =====

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub left: Vec<SegmentId>,
    pub right: Vec<SegmentId>,
    pub secondary: Vec<SegmentId>,
    pub separator: SeparatorStyle,
    pub options: SegmentOptions,
    pub colors: ColorScheme,
}

impl Preset {
    /// Layout candidates in order: left, then right, then secondary.
    pub fn candidates(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.left
            .iter()
            .chain(self.right.iter())
            .chain(self.secondary.iter())
            .copied()
    }
}

impl Default for Preset {
    fn default() -> Self {
        BuiltinPreset::Default.preset()
    }
}

/// Presets shipped with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinPreset {
    Default,
    Focused,
    Minimal,
    Compact,
    Full,
    Nerd,
    Ascii,
}

impl BuiltinPreset {
    pub const ALL: [BuiltinPreset; 7] = [
        BuiltinPreset::Default,
        BuiltinPreset::Focused,
        BuiltinPreset::Minimal,
        BuiltinPreset::Compact,
        BuiltinPreset::Full,
        BuiltinPreset::Nerd,
        BuiltinPreset::Ascii,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinPreset::Default => "default",
            BuiltinPreset::Focused => "focused",
            BuiltinPreset::Minimal => "minimal",
            BuiltinPreset::Compact => "compact",
            BuiltinPreset::Full => "full",
            BuiltinPreset::Nerd => "nerd",
            BuiltinPreset::Ascii => "ascii",
        }
    }

    /// One-line summary for `powerbar presets`
    pub fn description(self) -> &'static str {
        match self {
            BuiltinPreset::Default => "Balanced signal with one compact overflow line",
            BuiltinPreset::Focused => "Like default, without cache-read and cost",
            BuiltinPreset::Minimal => "Path, branch and context for narrow terminals",
            BuiltinPreset::Compact => "Model and git with a small cost/context tail",
            BuiltinPreset::Full => "Information-rich, powerline separators",
            BuiltinPreset::Nerd => "Every detail, for wide terminals and Nerd Fonts",
            BuiltinPreset::Ascii => "Font-safe separators",
        }
    }

    pub fn preset(self) -> Preset {
        use SegmentId::*;

        let (left, right, secondary, separator, options, colors) = match self {
            BuiltinPreset::Default => (
                vec![Pi, Model, Thinking, Path, Git, ContextPct, CacheRead, Cost],
                vec![],
                vec![ExtensionStatuses],
                SeparatorStyle::PowerlineThin,
                options(false, PathOptions::default(), GitOptions::all(), TimeOptions::default()),
                default_scheme(),
            ),
            BuiltinPreset::Focused => (
                vec![Pi, Path, Model, Thinking, ContextPct, Git],
                vec![],
                vec![ExtensionStatuses],
                SeparatorStyle::PowerlineThin,
                options(false, PathOptions::default(), GitOptions::all(), TimeOptions::default()),
                default_scheme(),
            ),
            BuiltinPreset::Minimal => (
                vec![Path, Git],
                vec![ContextPct],
                vec![],
                SeparatorStyle::Slash,
                options(true, PathOptions::default(), GitOptions::branch_only(), TimeOptions::default()),
                minimal_scheme(),
            ),
            BuiltinPreset::Compact => (
                vec![Model, Git],
                vec![Cost, ContextPct],
                vec![],
                SeparatorStyle::PowerlineThin,
                options(false, PathOptions::default(), GitOptions::no_untracked(), TimeOptions::default()),
                default_scheme(),
            ),
            BuiltinPreset::Full => (
                vec![Pi, Hostname, Model, Thinking, Path, Git],
                vec![
                    TokenIn,
                    TokenOut,
                    CacheRead,
                    Cost,
                    ContextPct,
                    TimeSpent,
                    Time,
                    ExtensionStatuses,
                ],
                vec![],
                SeparatorStyle::Powerline,
                options(false, abbreviated(50), GitOptions::all(), clock(false)),
                default_scheme(),
            ),
            BuiltinPreset::Nerd => (
                vec![Pi, Hostname, Model, Thinking, Path, Git, Session],
                vec![
                    TokenIn,
                    TokenOut,
                    CacheRead,
                    CacheWrite,
                    Cost,
                    ContextPct,
                    ContextTotal,
                    TimeSpent,
                    Time,
                    ExtensionStatuses,
                ],
                vec![],
                SeparatorStyle::Powerline,
                options(false, abbreviated(60), GitOptions::all(), clock(true)),
                nerd_scheme(),
            ),
            BuiltinPreset::Ascii => (
                vec![Model, Path, Git],
                vec![TokenTotal, Cost, ContextPct],
                vec![],
                SeparatorStyle::Ascii,
                options(true, abbreviated(40), GitOptions::all(), TimeOptions::default()),
                minimal_scheme(),
            ),
        };

        Preset {
            name: self.as_str().to_string(),
            left,
            right,
            secondary,
            separator,
            options,
            colors,
        }
    }
}

impl FromStr for BuiltinPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinPreset::ALL
            .iter()
            .copied()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| format!("Unknown preset '{}'", s))
    }
}

impl fmt::Display for BuiltinPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn options(show_thinking_level: bool, path: PathOptions, git: GitOptions, time: TimeOptions) -> SegmentOptions {
    SegmentOptions {
        model: ModelOptions { show_thinking_level },
        path,
        git,
        time,
    }
}

fn abbreviated(max_length: usize) -> PathOptions {
    PathOptions {
        mode: PathMode::Abbreviated,
        max_length,
    }
}

fn clock(show_seconds: bool) -> TimeOptions {
    TimeOptions {
        format: TimeFormat::TwentyFourHour,
        show_seconds,
    }
}

fn scheme_with(entries: &[(SemanticColor, &str)]) -> ColorScheme {
    let mut scheme = default_scheme();
    for &(role, value) in entries {
        scheme.insert(role, ColorValue::from(value));
    }
    scheme
}

/// Flatter palette for low-noise presets
fn minimal_scheme() -> ColorScheme {
    scheme_with(&[
        (SemanticColor::Pi, "dim"),
        (SemanticColor::Model, "text"),
        (SemanticColor::Path, "text"),
        (SemanticColor::GitClean, "dim"),
    ])
}

/// Saturated palette for dense presets
fn nerd_scheme() -> ColorScheme {
    scheme_with(&[
        (SemanticColor::Pi, "accent"),
        (SemanticColor::Model, "accent"),
        (SemanticColor::Path, "success"),
        (SemanticColor::Tokens, "primary"),
        (SemanticColor::Cost, "warning"),
    ])
}

/// Looks up a built-in preset, falling back to `default` for unknown names.
pub fn get_preset(name: &str) -> Preset {
    match name.parse::<BuiltinPreset>() {
        Ok(builtin) => builtin.preset(),
        Err(_) => {
            debug!("Unknown preset '{}', using default", name);
            BuiltinPreset::Default.preset()
        }
    }
}

// ===== User-defined presets =====

/// A preset as written under `[presets.<name>]` in the config file.
///
/// Segment ids are kept as strings so that an unknown id only drops that
/// segment instead of rejecting the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetDef {
    pub left: Vec<String>,
    pub right: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary: Vec<String>,
    pub separator: SeparatorStyle,
    pub options: SegmentOptions,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: NamedColorScheme,
}

impl PresetDef {
    pub fn into_preset(&self, name: &str) -> Preset {
        Preset {
            name: name.to_string(),
            left: parse_ids(name, &self.left),
            right: parse_ids(name, &self.right),
            secondary: parse_ids(name, &self.secondary),
            separator: self.separator,
            options: self.options.clone(),
            colors: scheme_from_names(&self.colors),
        }
    }
}

impl From<&Preset> for PresetDef {
    fn from(preset: &Preset) -> Self {
        let names = |ids: &[SegmentId]| ids.iter().map(|id| id.as_str().to_string()).collect();
        PresetDef {
            left: names(&preset.left),
            right: names(&preset.right),
            secondary: names(&preset.secondary),
            separator: preset.separator,
            options: preset.options.clone(),
            colors: preset
                .colors
                .iter()
                .map(|(role, value)| (role.as_str().to_string(), value.clone()))
                .collect(),
        }
    }
}

fn parse_ids(preset: &str, names: &[String]) -> Vec<SegmentId> {
    names
        .iter()
        .filter_map(|name| match name.parse::<SegmentId>() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("{} in preset '{}'; skipping", e, preset);
                None
            }
        })
        .collect()
}

/// Resolves preset names against user presets first, then built-ins.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    custom: BTreeMap<String, PresetDef>,
}

impl PresetCatalog {
    pub fn new(custom: BTreeMap<String, PresetDef>) -> Self {
        Self { custom }
    }

    pub fn get(&self, name: &str) -> Preset {
        match self.custom.get(name) {
            Some(def) => def.into_preset(name),
            None => get_preset(name),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name) || name.parse::<BuiltinPreset>().is_ok()
    }

    /// Built-in names followed by user-defined ones that don't shadow them.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = BuiltinPreset::ALL
            .iter()
            .map(|preset| preset.as_str().to_string())
            .collect();
        for name in self.custom.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

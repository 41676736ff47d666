//! Color values and ANSI escape construction.
//!
//! A [`ColorValue`] is either a literal true-color hex triplet, rendered here
//! directly, or a named theme token that only a
//! [`ThemeProvider`](crate::theme::ThemeProvider) can interpret.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// SGR reset sequence
pub const RESET: &str = "\x1b[0m";

/// Palette cycled by the rainbow effect
pub const RAINBOW_COLORS: [Rgb; 8] = [
    Rgb::new(0xb2, 0x81, 0xd6),
    Rgb::new(0xd7, 0x87, 0xaf),
    Rgb::new(0xfe, 0xbc, 0x38),
    Rgb::new(0xe4, 0xc0, 0x0f),
    Rgb::new(0x89, 0xd2, 0x81),
    Rgb::new(0x00, 0xaf, 0xaf),
    Rgb::new(0x17, 0x8f, 0xb9),
    Rgb::new(0xb2, 0x81, 0xd6),
];

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is required).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Foreground escape for this color
    pub fn fg_ansi(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Foreground escape for a 256-color palette index
pub fn fg_ansi_256(code: u8) -> String {
    format!("\x1b[38;5;{}m", code)
}

/// Wraps `text` in a true-color foreground and a trailing reset.
pub fn paint_hex(color: Rgb, text: &str) -> String {
    format!("{}{}{}", color.fg_ansi(), text, RESET)
}

/// Cycles [`RAINBOW_COLORS`] across the visible characters of `text`.
///
/// Whitespace and punctuation are emitted uncolored and don't advance the
/// palette. Each colored character is followed by a reset.
pub fn rainbow(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 24);
    let mut color_index = 0;
    for c in text.chars() {
        if c.is_whitespace() || c.is_ascii_punctuation() {
            result.push(c);
            continue;
        }
        let color = RAINBOW_COLORS[color_index % RAINBOW_COLORS.len()];
        result.push_str(&color.fg_ansi());
        result.push(c);
        result.push_str(RESET);
        color_index += 1;
    }
    result
}

/// A concrete color: literal hex or a theme token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorValue {
    /// Literal `#rrggbb`
    Hex(Rgb),
    /// Named token resolved by the theme (e.g. "accent", "warning")
    Named(String),
}

impl ColorValue {
    pub fn named(token: impl Into<String>) -> Self {
        ColorValue::Named(token.into())
    }
}

impl From<String> for ColorValue {
    fn from(s: String) -> Self {
        match Rgb::from_hex(&s) {
            Some(rgb) => ColorValue::Hex(rgb),
            None => ColorValue::Named(s),
        }
    }
}

impl From<&str> for ColorValue {
    fn from(s: &str) -> Self {
        ColorValue::from(s.to_string())
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorValue::Hex(rgb) => write!(f, "{}", rgb),
            ColorValue::Named(token) => write!(f, "{}", token),
        }
    }
}

/// Semantic color roles used by segments and separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemanticColor {
    Pi,
    Model,
    Path,
    GitDirty,
    GitClean,
    Staged,
    Unstaged,
    Untracked,
    Thinking,
    ThinkingMinimal,
    ThinkingLow,
    ThinkingMedium,
    Context,
    ContextWarn,
    ContextError,
    Cost,
    Tokens,
    Output,
    Separator,
}

impl SemanticColor {
    pub const ALL: [SemanticColor; 19] = [
        SemanticColor::Pi,
        SemanticColor::Model,
        SemanticColor::Path,
        SemanticColor::GitDirty,
        SemanticColor::GitClean,
        SemanticColor::Staged,
        SemanticColor::Unstaged,
        SemanticColor::Untracked,
        SemanticColor::Thinking,
        SemanticColor::ThinkingMinimal,
        SemanticColor::ThinkingLow,
        SemanticColor::ThinkingMedium,
        SemanticColor::Context,
        SemanticColor::ContextWarn,
        SemanticColor::ContextError,
        SemanticColor::Cost,
        SemanticColor::Tokens,
        SemanticColor::Output,
        SemanticColor::Separator,
    ];

    /// Built-in color, the last layer of the resolution cascade.
    pub fn default_value(self) -> ColorValue {
        let value = match self {
            SemanticColor::Pi => "accent",
            SemanticColor::Model => "#d787af",
            SemanticColor::Path => "#00afaf",
            SemanticColor::GitDirty => "warning",
            SemanticColor::GitClean => "success",
            SemanticColor::Staged => "success",
            SemanticColor::Unstaged => "warning",
            SemanticColor::Untracked => "muted",
            SemanticColor::Thinking => "muted",
            SemanticColor::ThinkingMinimal => "#875fd7",
            SemanticColor::ThinkingLow => "#5f87d7",
            SemanticColor::ThinkingMedium => "#5fafaf",
            SemanticColor::Context => "dim",
            SemanticColor::ContextWarn => "warning",
            SemanticColor::ContextError => "error",
            SemanticColor::Cost => "text",
            SemanticColor::Tokens => "muted",
            SemanticColor::Output => "#d7af5f",
            SemanticColor::Separator => "dim",
        };
        ColorValue::from(value)
    }

    /// Config-file spelling of this role (e.g. `gitDirty`)
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticColor::Pi => "pi",
            SemanticColor::Model => "model",
            SemanticColor::Path => "path",
            SemanticColor::GitDirty => "gitDirty",
            SemanticColor::GitClean => "gitClean",
            SemanticColor::Staged => "staged",
            SemanticColor::Unstaged => "unstaged",
            SemanticColor::Untracked => "untracked",
            SemanticColor::Thinking => "thinking",
            SemanticColor::ThinkingMinimal => "thinkingMinimal",
            SemanticColor::ThinkingLow => "thinkingLow",
            SemanticColor::ThinkingMedium => "thinkingMedium",
            SemanticColor::Context => "context",
            SemanticColor::ContextWarn => "contextWarn",
            SemanticColor::ContextError => "contextError",
            SemanticColor::Cost => "cost",
            SemanticColor::Tokens => "tokens",
            SemanticColor::Output => "output",
            SemanticColor::Separator => "separator",
        }
    }
}

impl FromStr for SemanticColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticColor::ALL
            .iter()
            .copied()
            .find(|color| color.as_str() == s)
            .ok_or_else(|| format!("Unknown semantic color '{}'", s))
    }
}

/// Mapping from semantic role to color. Missing roles fall through the cascade.
pub type ColorScheme = BTreeMap<SemanticColor, ColorValue>;

/// Color table as written in config files, keyed by role name.
pub type NamedColorScheme = BTreeMap<String, ColorValue>;

/// Converts a config color table into a [`ColorScheme`].
///
/// Unknown role names are skipped with a warning rather than rejected.
pub fn scheme_from_names(named: &NamedColorScheme) -> ColorScheme {
    named
        .iter()
        .filter_map(|(name, value)| match name.parse::<SemanticColor>() {
            Ok(role) => Some((role, value.clone())),
            Err(e) => {
                log::warn!("{}; ignoring color override", e);
                None
            }
        })
        .collect()
}

/// The complete built-in scheme.
pub fn default_scheme() -> ColorScheme {
    SemanticColor::ALL
        .iter()
        .map(|&color| (color, color.default_value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::visible_width;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#d787af"), Some(Rgb::new(0xd7, 0x87, 0xaf)));
        assert_eq!(Rgb::from_hex("#00AFAF"), Some(Rgb::new(0, 0xaf, 0xaf)));
        assert_eq!(Rgb::from_hex("d787af"), None);
        assert_eq!(Rgb::from_hex("#d787a"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
    }

    #[test]
    fn test_hex_escape() {
        assert_eq!(
            paint_hex(Rgb::new(0, 175, 175), "src"),
            "\x1b[38;2;0;175;175msrc\x1b[0m"
        );
        assert_eq!(fg_ansi_256(244), "\x1b[38;5;244m");
    }

    #[test]
    fn test_color_value_parsing() {
        assert_eq!(
            ColorValue::from("#ff8700"),
            ColorValue::Hex(Rgb::new(0xff, 0x87, 0x00))
        );
        assert_eq!(ColorValue::from("warning"), ColorValue::named("warning"));
        // Malformed hex is left for the theme to interpret
        assert_eq!(ColorValue::from("#fff"), ColorValue::named("#fff"));
    }

    #[test]
    fn test_color_value_serde() {
        let named: NamedColorScheme =
            toml::from_str("gitDirty = \"#ff8700\"\nseparator = \"muted\"\nbogus = \"red\"")
                .unwrap();
        let scheme = scheme_from_names(&named);
        assert_eq!(scheme.len(), 2);
        assert_eq!(
            scheme.get(&SemanticColor::GitDirty),
            Some(&ColorValue::Hex(Rgb::new(0xff, 0x87, 0x00)))
        );
        assert_eq!(
            scheme.get(&SemanticColor::Separator),
            Some(&ColorValue::named("muted"))
        );

        let json = serde_json::to_string(&ColorValue::Hex(Rgb::new(1, 2, 3))).unwrap();
        assert_eq!(json, "\"#010203\"");
    }

    #[test]
    fn test_semantic_color_names_round_trip() {
        for color in SemanticColor::ALL {
            assert_eq!(color.as_str().parse::<SemanticColor>(), Ok(color));
        }
        assert!("nonsense".parse::<SemanticColor>().is_err());
    }

    #[test]
    fn test_default_scheme_is_complete() {
        let scheme = default_scheme();
        assert_eq!(scheme.len(), SemanticColor::ALL.len());
        assert_eq!(
            scheme[&SemanticColor::Model],
            ColorValue::Hex(Rgb::new(0xd7, 0x87, 0xaf))
        );
    }

    #[test]
    fn test_rainbow_skips_punctuation() {
        let out = rainbow("think:high");
        assert_eq!(visible_width(&out), "think:high".len());
        // ':' is uncolored and not followed by its own reset
        assert!(out.contains("\x1b[0m:\x1b[38;2;"));
        // Nine visible letters, nine resets
        assert_eq!(out.matches(RESET).count(), 9);
        // The palette restarts with the first color for the first letter
        assert!(out.starts_with(&RAINBOW_COLORS[0].fg_ansi()));
    }

    #[test]
    fn test_rainbow_palette_cycles() {
        let out = rainbow("abcdefghij");
        let ninth = format!("{}i", RAINBOW_COLORS[0].fg_ansi());
        assert!(out.contains(&ninth));
    }
}

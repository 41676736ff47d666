//! Separator styles drawn between adjacent segments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Glyph pair for a separator style. Rows use the `left` glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorDef {
    pub left: &'static str,
    pub right: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeparatorStyle {
    Powerline,
    #[default]
    PowerlineThin,
    Slash,
    Pipe,
    Block,
    None,
    Ascii,
    Dot,
    Chevron,
    Star,
}

impl SeparatorStyle {
    pub const ALL: [SeparatorStyle; 10] = [
        SeparatorStyle::Powerline,
        SeparatorStyle::PowerlineThin,
        SeparatorStyle::Slash,
        SeparatorStyle::Pipe,
        SeparatorStyle::Block,
        SeparatorStyle::None,
        SeparatorStyle::Ascii,
        SeparatorStyle::Dot,
        SeparatorStyle::Chevron,
        SeparatorStyle::Star,
    ];

    pub fn def(self) -> SeparatorDef {
        let (left, right) = match self {
            SeparatorStyle::Powerline => ("\u{e0b0}", "\u{e0b2}"),
            SeparatorStyle::PowerlineThin => ("\u{e0b1}", "\u{e0b3}"),
            SeparatorStyle::Slash => ("/", "/"),
            SeparatorStyle::Pipe => ("|", "|"),
            SeparatorStyle::Block => ("\u{2588}", "\u{2588}"),
            SeparatorStyle::None => ("", ""),
            SeparatorStyle::Ascii => (">", "<"),
            SeparatorStyle::Dot => ("\u{00b7}", "\u{00b7}"),
            SeparatorStyle::Chevron => ("\u{203a}", "\u{2039}"),
            SeparatorStyle::Star => ("\u{2726}", "\u{2726}"),
        };
        SeparatorDef { left, right }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeparatorStyle::Powerline => "powerline",
            SeparatorStyle::PowerlineThin => "powerline-thin",
            SeparatorStyle::Slash => "slash",
            SeparatorStyle::Pipe => "pipe",
            SeparatorStyle::Block => "block",
            SeparatorStyle::None => "none",
            SeparatorStyle::Ascii => "ascii",
            SeparatorStyle::Dot => "dot",
            SeparatorStyle::Chevron => "chevron",
            SeparatorStyle::Star => "star",
        }
    }
}

impl FromStr for SeparatorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeparatorStyle::ALL
            .iter()
            .copied()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| format!("Unknown separator style '{}'", s))
    }
}

impl fmt::Display for SeparatorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

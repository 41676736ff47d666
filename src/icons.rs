//! Icon glyphs prefixed to segment text.

use serde::{Deserialize, Serialize};

/// Separator used inside a segment (model + thinking level, extension statuses)
pub const SEP_DOT: &str = " \u{00b7} ";

/// Which icon set to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    /// Nerd Font glyphs
    #[default]
    Nerd,
    /// No icons; segments render text only
    Plain,
}

/// Icon glyph per segment role. An empty glyph means "no icon".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSet {
    pub pi: &'static str,
    pub model: &'static str,
    pub folder: &'static str,
    pub branch: &'static str,
    pub git: &'static str,
    pub input: &'static str,
    pub output: &'static str,
    pub tokens: &'static str,
    pub context: &'static str,
    pub auto: &'static str,
    pub time: &'static str,
    pub session: &'static str,
    pub host: &'static str,
    pub cache: &'static str,
}

impl IconSet {
    pub const fn nerd() -> Self {
        IconSet {
            pi: "\u{03c0}",
            model: "\u{ec19}",
            folder: "\u{f115}",
            branch: "\u{f126}",
            git: "\u{f1d3}",
            input: "\u{f090}",
            output: "\u{f08b}",
            tokens: "\u{e26b}",
            context: "\u{e70f}",
            auto: "\u{f0068}",
            time: "\u{f017}",
            session: "\u{f2bd}",
            host: "\u{f109}",
            cache: "\u{f1c0}",
        }
    }

    pub const fn plain() -> Self {
        IconSet {
            pi: "",
            model: "",
            folder: "",
            branch: "",
            git: "",
            input: "",
            output: "",
            tokens: "",
            context: "",
            auto: "",
            time: "",
            session: "",
            host: "",
            cache: "",
        }
    }

    pub const fn for_style(style: IconStyle) -> Self {
        match style {
            IconStyle::Nerd => Self::nerd(),
            IconStyle::Plain => Self::plain(),
        }
    }
}

impl Default for IconSet {
    fn default() -> Self {
        Self::nerd()
    }
}

/// `"{icon} {text}"`, or just `text` when the icon is empty.
pub fn with_icon(icon: &str, text: &str) -> String {
    if icon.is_empty() {
        text.to_string()
    } else {
        format!("{} {}", icon, text)
    }
}

//! Visible-width measurement for styled terminal strings.
//!
//! Widths are computed by stripping SGR escape sequences (`ESC [ ... m`) and
//! counting the remaining characters as one column each. Wide glyphs (CJK,
//! most emoji) and zero-width characters (combining marks, joiners) are
//! therefore miscounted. This is a known limitation of the measurement model.

use regex::Regex;
use std::sync::OnceLock;

fn sgr_pattern() -> &'static Regex {
    static SGR: OnceLock<Regex> = OnceLock::new();
    SGR.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("static SGR pattern is valid"))
}

fn escape_pattern() -> &'static Regex {
    // CSI sequences of any kind plus OSC sequences terminated by BEL or ST
    static ESC: OnceLock<Regex> = OnceLock::new();
    ESC.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(\x07|\x1b\\)?")
            .expect("static escape pattern is valid")
    })
}

/// Removes every color/style escape sequence from `s`.
pub fn strip_ansi(s: &str) -> String {
    sgr_pattern().replace_all(s, "").into_owned()
}

/// Number of terminal columns `s` occupies once printed.
///
/// # Examples
///
/// ```
/// use powerbar::width::visible_width;
///
/// assert_eq!(visible_width("\x1b[36mmain\x1b[0m"), 4);
/// assert_eq!(visible_width(""), 0);
/// ```
pub fn visible_width(s: &str) -> usize {
    if !s.contains('\x1b') {
        return s.chars().count();
    }
    sgr_pattern()
        .split(s)
        .map(|run| run.chars().count())
        .sum()
}

/// Makes untrusted text safe to embed in a status line.
///
/// Strips escape sequences and control characters so that a branch name or
/// model name can't inject its own styling or move the cursor.
pub fn sanitize_for_terminal(s: &str) -> String {
    let without_escapes = escape_pattern().replace_all(s, "");
    without_escapes.chars().filter(|c| !c.is_control()).collect()
}

/// Like [`sanitize_for_terminal`], but keeps SGR color/style sequences.
///
/// For text that arrives pre-styled: colors survive, while newlines, cursor
/// movement and other escapes are removed.
pub fn sanitize_keep_sgr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for sgr in sgr_pattern().find_iter(s) {
        out.push_str(&sanitize_for_terminal(&s[last..sgr.start()]));
        out.push_str(sgr.as_str());
        last = sgr.end();
    }
    out.push_str(&sanitize_for_terminal(&s[last..]));
    out
}

//! Number, duration and path formatting shared by the segment renderers.

use std::path::Path;

/// Container workspace prefix stripped from displayed paths
const WORK_PREFIX: &str = "/work/";

/// Abbreviates a token count.
///
/// `950` → `"950"`, `1500` → `"1.5k"`, `25000` → `"25k"`, `2_500_000` → `"2.5M"`.
pub fn format_tokens(n: u64) -> String {
    if n < 1_000 {
        n.to_string()
    } else if n < 10_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else if n < 1_000_000 {
        format!("{}k", (n as f64 / 1_000.0).round() as u64)
    } else if n < 10_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else {
        format!("{}M", (n as f64 / 1_000_000.0).round() as u64)
    }
}

/// Formats an elapsed time in milliseconds as `HhMm`, `MmSs` or `Ss`.
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h{}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// Replaces a leading home directory with `~`.
///
/// Only whole path components match, so `/home/al` does not shorten
/// `/home/alice`.
pub fn shorten_path(path: &str, home: Option<&str>) -> String {
    if path.is_empty() {
        return String::new();
    }

    if let Some(home) = home.map(|h| h.trim_end_matches('/')).filter(|h| !h.is_empty()) {
        if path == home {
            return "~".to_string();
        }
        if let Some(rest) = path.strip_prefix(home) {
            if rest.starts_with('/') {
                return format!("~{}", rest);
            }
        }
    }
    path.to_string()
}

/// Last path component, or the path itself when it has none (e.g. `/`).
pub fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Home-shortened path with the container workspace prefix removed.
pub fn display_path(path: &str, home: Option<&str>) -> String {
    let shortened = shorten_path(path, home);
    match shortened.strip_prefix(WORK_PREFIX) {
        Some(rest) => rest.to_string(),
        None => shortened,
    }
}

/// Keeps the tail of `text`, prefixed with `…`, when it exceeds `max_len` characters.
pub fn truncate_start(text: &str, max_len: usize) -> String {
    let max_len = max_len.max(1);
    let len = text.chars().count();
    if len <= max_len {
        return text.to_string();
    }
    let tail: String = text.chars().skip(len - (max_len - 1)).collect();
    format!("\u{2026}{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(0), "0");
        assert_eq!(format_tokens(950), "950");
        assert_eq!(format_tokens(1500), "1.5k");
        assert_eq!(format_tokens(9_999), "10.0k");
        assert_eq!(format_tokens(25_000), "25k");
        assert_eq!(format_tokens(200_000), "200k");
        assert_eq!(format_tokens(2_500_000), "2.5M");
        assert_eq!(format_tokens(12_400_000), "12M");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(999), "0s");
        assert_eq!(format_duration(45_000), "45s");
        assert_eq!(format_duration(125_000), "2m5s");
        assert_eq!(format_duration(3_600_000), "1h0m");
        assert_eq!(format_duration(3_723_000), "1h2m");
    }

    #[test]
    fn test_shorten_path() {
        let home = Some("/home/user");
        assert_eq!(shorten_path("/home/user", home), "~");
        assert_eq!(shorten_path("/home/user/projects", home), "~/projects");
        assert_eq!(shorten_path("/home/username", home), "/home/username");
        assert_eq!(shorten_path("/tmp/test", home), "/tmp/test");
        assert_eq!(shorten_path("/tmp/test", None), "/tmp/test");
        assert_eq!(shorten_path("", home), "");
        assert_eq!(shorten_path("/home/user/x", Some("/home/user/")), "~/x");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/home/user/project"), "project");
        assert_eq!(basename("/home/user/project/"), "project");
        assert_eq!(basename("/"), "/");
    }

    #[test]
    fn test_display_path_strips_work_prefix() {
        assert_eq!(display_path("/work/repo/src", None), "repo/src");
        assert_eq!(display_path("/workspace/repo", None), "/workspace/repo");
        assert_eq!(display_path("/home/me/repo", Some("/home/me")), "~/repo");
    }

    #[test]
    fn test_truncate_start() {
        assert_eq!(truncate_start("short", 10), "short");
        assert_eq!(truncate_start("~/a/very/long/path", 8), "\u{2026}ng/path");
        assert_eq!(truncate_start("~/a/very/long/path", 8).chars().count(), 8);
        assert_eq!(truncate_start("abc", 0), "\u{2026}");
    }
}

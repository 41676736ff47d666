//! Build information captured by `build.rs`, shown by `--version-full`.

use std::fmt;

pub struct VersionInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_dirty: bool,
    pub build_date: &'static str,
    pub build_profile: &'static str,
    pub rustc_version: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: env!("POWERBAR_VERSION"),
            git_hash: env!("POWERBAR_GIT_HASH"),
            git_dirty: env!("POWERBAR_GIT_DIRTY") == "true",
            build_date: env!("POWERBAR_BUILD_DATE"),
            build_profile: env!("POWERBAR_BUILD_PROFILE"),
            rustc_version: env!("POWERBAR_RUSTC_VERSION"),
        }
    }

    /// `v0.4.0 (abc1234)`, with `+dirty` for builds from a modified tree
    pub fn short(&self) -> String {
        let dirty = if self.git_dirty { "+dirty" } else { "" };
        format!("v{} ({}{})", self.version, self.git_hash, dirty)
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "powerbar {}", self.short())?;
        writeln!(f, "Built: {} ({})", self.build_date, self.build_profile)?;
        writeln!(f, "Rustc: {}", self.rustc_version)
    }
}

/// Multi-line version report for `--version-full`
pub fn version_string() -> String {
    VersionInfo::current().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = VersionInfo::current();
        assert!(!info.version.is_empty());
        assert!(!info.git_hash.is_empty());
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_short_version() {
        let info = VersionInfo::current();
        let short = info.short();
        assert!(short.starts_with('v'));
        assert!(short.contains(info.version));
        assert_eq!(short.contains("+dirty"), info.git_dirty);
    }

    #[test]
    fn test_version_display() {
        let report = version_string();
        assert!(report.starts_with("powerbar v"));
        assert!(report.contains("Built:"));
        assert!(report.contains("Rustc:"));
    }
}

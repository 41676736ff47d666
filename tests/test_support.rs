//! Test environment isolation support
//!
//! Keeps tests from reading configuration or themes from the host system.
//! Without isolation a contributor's `~/.powerbar.toml`, a user theme in
//! `~/.config/powerbar/themes`, or `POWERBAR_*`/`NO_COLOR` in their shell
//! would change what the binary renders.
//!
//! # Usage
//!
//! ```ignore
//! mod test_support;
//!
//! #[test]
//! fn my_test() {
//!     let output = test_support::powerbar()
//!         .args(["--width", "80"])
//!         .output()
//!         .unwrap();
//! }
//! ```

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Temporary directory that lives for the duration of the test process.
static TEMP_BASE: OnceLock<TempDir> = OnceLock::new();

fn temp_base() -> PathBuf {
    TEMP_BASE
        .get_or_init(|| {
            let temp = TempDir::new().expect("Failed to create temp directory for test isolation");
            for sub in ["home", "config"] {
                std::fs::create_dir_all(temp.path().join(sub))
                    .expect("Failed to create isolated test dir");
            }
            temp
        })
        .path()
        .to_path_buf()
}

/// Isolated home directory
pub fn test_home() -> PathBuf {
    temp_base().join("home")
}

/// Isolated XDG config directory
pub fn test_config_dir() -> PathBuf {
    temp_base().join("config")
}

/// A `powerbar` command with HOME/XDG pointed at the isolated directories
/// and every host variable that influences rendering removed.
pub fn powerbar() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_powerbar"));
    cmd.env("HOME", test_home())
        .env("XDG_CONFIG_HOME", test_config_dir())
        .env_remove("POWERBAR_CONFIG")
        .env_remove("POWERBAR_PRESET")
        .env_remove("NO_COLOR")
        .env_remove("COLUMNS")
        .env_remove("RUST_LOG");
    cmd
}

/// Runs `cmd` with `stdin` piped in and waits for it to finish.
pub fn run_with_input(mut cmd: Command, stdin: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn powerbar");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for powerbar")
}

/// Output lines of a successful run.
pub fn stdout_lines(output: &Output) -> Vec<String> {
    assert!(
        output.status.success(),
        "powerbar failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| line.to_string())
        .collect()
}

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// A config home that never holds a `bfi.toml`.
fn empty_config_home() -> PathBuf {
    Path::new(env!("CARGO_TARGET_TMPDIR")).join("bfi-empty-home")
}

/// `bfi` with no `BF_*` overrides and no user config file in reach.
pub fn cargo_bin() -> Command {
    cargo_bin_with_home(&empty_config_home())
}

/// `bfi` whose `HOME` is `home` and whose XDG config dir is `home/.config`.
pub fn cargo_bin_with_home(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bfi").unwrap();
    cmd.env_remove("BF_EOF")
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_TIMEOUT_MS")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

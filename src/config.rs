use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use cross_xdg::BaseDirs;
use crate::io::EofPolicy;

/// Interpreter defaults that the CLI falls back to when a flag is not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub eof: EofPolicy,
    pub max_steps: Option<usize>,
    pub timeout_ms: Option<u64>,
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Settings from `bfi.toml` with `BF_*` environment overrides applied.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        let base = load_from_toml().unwrap_or_default();
        apply_env(base, |key| std::env::var(key).ok())
    })
}

/// Overlay `BF_EOF`, `BF_MAX_STEPS` and `BF_TIMEOUT_MS` onto `base`.
/// Values that fail to parse are ignored.
pub fn apply_env<F>(mut base: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(eof) = lookup("BF_EOF").and_then(|s| s.parse().ok()) {
        base.eof = eof;
    }
    if let Some(n) = lookup("BF_MAX_STEPS").and_then(|s| s.trim().parse().ok()) {
        base.max_steps = Some(n);
    }
    if let Some(ms) = lookup("BF_TIMEOUT_MS").and_then(|s| s.trim().parse().ok()) {
        base.timeout_ms = Some(ms);
    }
    base
}

fn load_from_toml() -> Option<Settings> {
    let base_dirs = BaseDirs::new().ok()?;

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let config_home = base_dirs.config_home();

    let mut path = PathBuf::from(config_home);
    path.push("bfi.toml");

    let content = fs::read_to_string(path).ok()?;
    Some(parse_settings(&content))
}

/// Parse the `[interpreter]` section of a `bfi.toml` file.
///
/// Very small hand-rolled parser: `key = value` pairs, values quoted or bare,
/// `#` starts a comment line. Unknown keys and unparsable values are skipped.
pub fn parse_settings(content: &str) -> Settings {
    let mut in_section = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = &line[1..line.len()-1] == "interpreter";
            continue;
        }
        if !in_section { continue; }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = line[eq+1..].trim();
            // Accept quoted or unquoted
            let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                val_raw[1..val_raw.len()-1].to_string()
            } else { val_raw.to_string() };
            map.insert(key, val);
        }
    }

    let mut cfg = Settings::default();

    if let Some(eof) = map.get("eof").and_then(|s| s.parse().ok()) {
        cfg.eof = eof;
    }
    if let Some(n) = map.get("max_steps").and_then(|s| s.parse().ok()) {
        cfg.max_steps = Some(n);
    }
    if let Some(ms) = map.get("timeout_ms").and_then(|s| s.parse().ok()) {
        cfg.timeout_ms = Some(ms);
    }

    cfg
}

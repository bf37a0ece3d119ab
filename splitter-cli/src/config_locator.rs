use splitter_core::SplitterConfig;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file, checked after `--config`
pub const CONFIG_ENV_VAR: &str = "REPORT_SPLITTER_CONFIG";

/// Where the effective config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Flag(PathBuf),
    Env(PathBuf),
    UserDir(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Flag(p) | ConfigSource::Env(p) | ConfigSource::UserDir(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ConfigSource::Flag(p) => format!("Loaded config from: {}", p.display()),
            ConfigSource::Env(p) => format!("Loaded config from ${CONFIG_ENV_VAR}: {}", p.display()),
            ConfigSource::UserDir(p) => format!("Loaded user config: {}", p.display()),
            ConfigSource::Defaults => "Using default config".to_string(),
        }
    }
}

/// `~/.config/report-splitter/config.yaml` on Linux, the platform
/// equivalent elsewhere.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("report-splitter").join("config.yaml"))
}

/// Resolve the config location: `--config`, then the env var, then the
/// user config file if it exists, then built-in defaults.
pub fn locate_config(flag: Option<&str>) -> ConfigSource {
    locate_with(flag, std::env::var(CONFIG_ENV_VAR).ok(), user_config_path())
}

fn locate_with(flag: Option<&str>, env_value: Option<String>, user_path: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = flag {
        return ConfigSource::Flag(PathBuf::from(path));
    }
    // An empty env var counts as unset
    if let Some(path) = env_value.filter(|v| !v.trim().is_empty()) {
        return ConfigSource::Env(PathBuf::from(path));
    }
    match user_path {
        Some(path) if path.is_file() => ConfigSource::UserDir(path),
        _ => ConfigSource::Defaults,
    }
}

/// Locate and load the config. An unreadable file logs a warning and falls
/// back to defaults.
pub fn load_config(flag: Option<&str>) -> (SplitterConfig, ConfigSource) {
    let source = locate_config(flag);
    let path = source.path().map(|p| p.to_string_lossy().into_owned());
    let config = SplitterConfig::load_with_fallback(path.as_deref());
    (config, source)
}

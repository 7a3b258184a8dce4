//! Configuration utilities - loading, reloading, and access helpers
//!
//! - Loading configuration from disk (defaults when the file is missing)
//! - Hot-reloading configuration at runtime
//! - Thread-safe access helpers

use super::schemas::Config;
use crate::errors::ConfigError;
use crate::logger::{self, LogTag};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Global configuration instance
///
/// This is the single source of truth for all configuration values.
/// Access it using the helper functions below.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Path the configuration was loaded from, used by save/reload
static CONFIG_PATH: OnceCell<PathBuf> = OnceCell::new();

/// Parse a configuration file, falling back to defaults when it does not exist
pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path.display()),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    toml::from_str::<Config>(&contents).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load configuration from the default location and initialize the global CONFIG
pub fn load_config() -> Result<(), ConfigError> {
    load_config_from_path(&crate::paths::get_config_path())
}

/// Load configuration from a specific file path
pub fn load_config_from_path(path: &Path) -> Result<(), ConfigError> {
    let config = read_config_file(path)?;

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    let _ = CONFIG_PATH.set(path.to_path_buf());

    logger::info(
        LogTag::Config,
        &format!("Configuration loaded from {}", path.display()),
    );
    Ok(())
}

/// Reload configuration from disk
///
/// The configuration is atomically replaced, so reads are always consistent.
pub fn reload_config() -> Result<(), ConfigError> {
    let path = config_path();
    let fresh = read_config_file(&path)?;

    let lock = CONFIG.get().ok_or(ConfigError::NotInitialized)?;
    let mut guard = lock.write().map_err(|_| ConfigError::LockPoisoned)?;
    *guard = fresh;

    logger::info(
        LogTag::Config,
        &format!("Configuration reloaded from {}", path.display()),
    );
    Ok(())
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when `load_config` was never called, so library
/// consumers and tests can use config-driven helpers without a file.
///
/// # Example
/// ```rust,ignore
/// let max_inputs = with_config(|cfg| cfg.auth.max_code_input_attempts);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => match lock.read() {
            Ok(config) => f(&config),
            Err(poisoned) => f(&poisoned.into_inner()),
        },
        None => f(&Config::default()),
    }
}

/// Get a clone of the entire configuration
///
/// Useful when values must be held across await points.
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

/// Serialize a configuration to pretty TOML
pub fn render_config(config: &Config) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))
}

/// Save the current configuration to disk
///
/// `path` defaults to the file the configuration was loaded from.
pub fn save_config(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
    let rendered = with_config(render_config)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    std::fs::write(&path, rendered).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(path)
}

fn config_path() -> PathBuf {
    CONFIG_PATH
        .get()
        .cloned()
        .unwrap_or_else(crate::paths::get_config_path)
}

//! Centralized path resolution for tgauth
//!
//! All file and directory paths are resolved through this module so the CLI,
//! the stores and the logger agree on locations.
//!
//! ## Path Strategy
//!
//! `TGAUTH_HOME` overrides everything. Otherwise the platform data directory
//! is used:
//! - **macOS**: `~/Library/Application Support/TgAuth/`
//! - **Windows**: `%LOCALAPPDATA%\TgAuth\`
//! - **Linux**: `$XDG_DATA_HOME/TgAuth/` (fallback `~/.local/share/TgAuth/`)
//!
//! ## Directory Structure
//!
//! ```text
//! TgAuth/
//! ├── data/
//! │ ├── config.toml
//! │ ├── sessions.db   (sqlite backend)
//! │ └── sessions.json (json backend)
//! └── logs/
//!   └── tgauth_*.log
//! ```

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

/// Environment variable that pins the base directory
pub const HOME_ENV_VAR: &str = "TGAUTH_HOME";

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
    const APP_DIR: &str = "TgAuth";

    if let Ok(home) = std::env::var(HOME_ENV_VAR) {
        if !home.trim().is_empty() {
            return PathBuf::from(home);
        }
    }

    if let Some(dir) = dirs::data_local_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(dir) = dirs::data_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(APP_DIR);
    }

    PathBuf::from(APP_DIR)
}

// =============================================================================
// DIRECTORY ACCESSORS
// =============================================================================

/// Returns the base directory for all tgauth data
pub fn get_base_directory() -> PathBuf {
    BASE_DIRECTORY.clone()
}

/// Returns the data directory path (config and stores)
pub fn get_data_directory() -> PathBuf {
    BASE_DIRECTORY.join("data")
}

/// Returns the logs directory path
pub fn get_logs_directory() -> PathBuf {
    BASE_DIRECTORY.join("logs")
}

// =============================================================================
// FILE PATHS
// =============================================================================

/// Returns the main configuration file path
pub fn get_config_path() -> PathBuf {
    get_data_directory().join("config.toml")
}

/// Resolve a configured storage file name
///
/// Absolute paths are used as-is, relative ones live in the data directory.
pub fn resolve_data_file(name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        get_data_directory().join(path)
    }
}

/// Create every directory tgauth writes into
pub fn ensure_all_directories() -> Result<(), String> {
    let dirs_to_create = vec![
        ("base", get_base_directory()),
        ("data", get_data_directory()),
        ("logs", get_logs_directory()),
    ];

    for (name, dir) in dirs_to_create {
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                format!(
                    "Failed to create {} directory at {}: {}",
                    name,
                    dir.display(),
                    e
                )
            })?;
        }
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

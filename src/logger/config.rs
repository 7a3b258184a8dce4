/// Logger configuration derived from command-line arguments
///
/// Recognized flags:
/// - `--debug-<tag>`   enable DEBUG output for one tag (e.g. `--debug-auth`)
/// - `--verbose`       enable VERBOSE output for every tag
/// - `--verbose-<tag>` enable VERBOSE output for one tag
/// - `--quiet`         only show errors
/// - `--only-<tag>`    restrict INFO/WARNING output to the listed tags
/// - `--no-log-file`   disable file persistence
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub debug_tags: HashSet<String>,
    pub verbose_tags: HashSet<String>,
    pub enabled_tags: HashSet<String>,
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Debug,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            file_logging: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Run `f` with read access to the current logger configuration
pub fn with_logger_config<R>(f: impl FnOnce(&LoggerConfig) -> R) -> R {
    match LOGGER_CONFIG.read() {
        Ok(config) => f(&config),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Build the configuration from an explicit argument list
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--quiet" {
            config.min_level = LogLevel::Error;
        } else if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--no-log-file" {
            config.file_logging = false;
        } else if let Some(tag) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(tag.to_lowercase());
        } else if let Some(tag) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(tag.to_lowercase());
        } else if let Some(tag) = arg.strip_prefix("--only-") {
            config.enabled_tags.insert(tag.to_lowercase());
        }
    }

    config
}

/// Scan the process arguments and install the resulting configuration
pub fn init_from_args() {
    set_logger_config(config_from_args(&get_cmd_args()));
}

impl LoggerConfig {
    /// True when `--debug-<tag>` (or verbose for that tag) was given
    pub fn is_debug_enabled_for_tag(&self, tag: &LogTag) -> bool {
        let key = tag.to_debug_key();
        self.debug_tags.contains(&key) || self.verbose_tags.contains(&key)
    }

    /// True when `--verbose-<tag>` was given
    pub fn is_verbose_enabled_for_tag(&self, tag: &LogTag) -> bool {
        self.verbose_tags.contains(&tag.to_debug_key())
    }
}

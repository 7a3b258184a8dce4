/// Core logging implementation with automatic filtering
///
/// This module contains the central logging logic that:
/// - Checks if a log should be displayed based on level and tag
/// - Delegates to the format module for output
use super::config::with_logger_config;
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Verbose level requires --verbose OR --verbose-<module> for that tag
/// 3. Debug level requires --debug-<module> for that tag
/// 4. Otherwise check against the minimum level threshold
/// 5. If enabled_tags is non-empty, tag must be in the set
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    with_logger_config(|config| {
        // Rule 1: Errors always log
        if level == LogLevel::Error {
            return true;
        }

        // Rule 2: Verbose needs an explicit opt-in
        if level == LogLevel::Verbose {
            return config.min_level == LogLevel::Verbose || config.is_verbose_enabled_for_tag(tag);
        }

        // Rule 3: Debug is per tag
        if level == LogLevel::Debug {
            return config.min_level >= LogLevel::Debug && config.is_debug_enabled_for_tag(tag);
        }

        // Rule 4: Minimum level threshold
        if level > config.min_level {
            return false;
        }

        // Rule 5: Tag allow-list (empty set = all enabled)
        if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
            return false;
        }

        true
    })
}

/// Internal logging function with automatic filtering
pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level.as_str(), message);
}

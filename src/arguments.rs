/// Centralized argument handling for tgauth
///
/// Logger flags (`--debug-<tag>`, `--verbose`, `--verbose-<tag>`, `--quiet`,
/// `--only-<tag>`, `--no-log-file`) are read from the raw process arguments
/// and stripped before the CLI parser sees the rest.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
/// Thread-safe singleton that stores arguments for access throughout the application
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// True for flags consumed by the logger rather than the CLI parser
pub fn is_logger_flag(arg: &str) -> bool {
    arg == "--quiet"
        || arg == "--verbose"
        || arg == "--no-log-file"
        || arg.starts_with("--debug-")
        || arg.starts_with("--verbose-")
        || arg.starts_with("--only-")
}

/// Process arguments with logger flags removed
pub fn args_without_logger_flags() -> Vec<String> {
    get_cmd_args()
        .into_iter()
        .filter(|a| !is_logger_flag(a))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_flags_detected() {
        assert!(is_logger_flag("--debug-auth"));
        assert!(is_logger_flag("--verbose"));
        assert!(is_logger_flag("--only-store"));
        assert!(!is_logger_flag("session"));
        assert!(!is_logger_flag("--config"));
    }
}

/// Log tags identify the subsystem a message comes from
///
/// The debug key of a tag is what `--debug-<key>` / `--verbose-<key>`
/// command-line flags match against.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Auth,
    Session,
    Store,
    Proxy,
    Config,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug-<key>` flags and the enabled-tags filter
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Auth => "auth".to_string(),
            LogTag::Session => "session".to_string(),
            LogTag::Store => "store".to_string(),
            LogTag::Proxy => "proxy".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Other(name) => name.to_lowercase(),
        }
    }

    /// Uppercase label without colors, used for file output
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Other(name) => name.to_uppercase(),
            other => other.to_debug_key().to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

//! Configuration loading errors.

/// Config load error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoadError {
    /// I/O error
    Io(String),
    /// Parse error
    Parse(String),
    /// Values that parse but cannot work together
    Invalid(String),
}

impl ConfigLoadError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigLoadError::Io(_) => "CONFIG_IO",
            ConfigLoadError::Parse(_) => "CONFIG_PARSE",
            ConfigLoadError::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigLoadError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigLoadError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

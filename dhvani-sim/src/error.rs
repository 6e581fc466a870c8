//! Error types for DhvaniSim

use dhvani_nav::ConfigLoadError;
use thiserror::Error;

/// DhvaniSim error type
#[derive(Error, Debug)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Expectation failed: {0}")]
    Expectation(String),
}

impl SimError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "SIM_IO",
            Self::Scenario(_) => "SIM_SCENARIO",
            Self::Config(_) => "SIM_CONFIG",
            Self::Expectation(_) => "SIM_EXPECTATION",
        }
    }
}

impl From<serde_yaml::Error> for SimError {
    fn from(e: serde_yaml::Error) -> Self {
        SimError::Scenario(e.to_string())
    }
}

impl From<ConfigLoadError> for SimError {
    fn from(e: ConfigLoadError) -> Self {
        SimError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is an invalid language.")]
    InvalidLanguage(String),

    #[error("{0} is an invalid model index.")]
    InvalidModelIndex(usize),

    #[error("Failed to install {package}: {message}")]
    Installation { package: String, message: String },

    /// Diagnostic text of a translation run that produced no output, verbatim.
    #[error("{0}")]
    Execution(String),

    #[error("Environment error: {0}")]
    EnvironmentState(String),

    #[error("{program} did not finish within {}s", .timeout.as_secs_f64())]
    Timeout { program: String, timeout: Duration },

    #[error("{0} was cancelled")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// True for caller input errors raised before any subprocess is started.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidLanguage(_) | Self::InvalidModelIndex(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

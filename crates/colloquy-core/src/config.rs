use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ColloquyError, Result};

/// Number of most recent turns forwarded to the assistant on each call.
pub const DEFAULT_CONTEXT_LIMIT: usize = 6;

/// Assistant content substituted when the request could not complete.
pub const DEFAULT_CONNECTIVITY_FAILURE_MESSAGE: &str = "Unable to connect to server";

/// Assistant content used when the service answered with neither text nor error.
pub const DEFAULT_NO_RESPONSE_MESSAGE: &str = "No response";

/// Top-level configuration for Colloquy.
///
/// Loaded from `~/.colloquy/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColloquyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ColloquyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ColloquyConfig = toml::from_str(&content)?;
        info!(
            path = %path.display(),
            context_limit = config.chat.context_limit,
            request_timeout_secs = ?config.chat.request_timeout_secs,
            "Colloquy configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    context_limit = DEFAULT_CONTEXT_LIMIT,
                    "Colloquy configuration unavailable, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ColloquyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!(
            path = %path.display(),
            log_level = %self.general.log_level,
            "Colloquy configuration saved"
        );
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Conversation session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of turns sent upstream as context.
    pub context_limit: usize,
    /// Give up on an assistant call after this many seconds. Unset waits forever.
    pub request_timeout_secs: Option<u64>,
    /// Assistant content appended when the call fails to complete.
    pub connectivity_failure_message: String,
    /// Assistant content appended when the reply carries neither answer nor error.
    pub no_response_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_limit: DEFAULT_CONTEXT_LIMIT,
            request_timeout_secs: None,
            connectivity_failure_message: DEFAULT_CONNECTIVITY_FAILURE_MESSAGE.to_string(),
            no_response_message: DEFAULT_NO_RESPONSE_MESSAGE.to_string(),
        }
    }
}

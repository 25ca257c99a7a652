use serde::{Deserialize, Serialize};

/// Default generation server address.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:11434";
/// Default model name.
pub const DEFAULT_MODEL: &str = "llama3";

/// User-configurable backend settings. Persistence lives in the settings UI;
/// this type only carries and validates the values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    pub endpoint_url: String,
    pub model: String,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("please enter a valid server URL")]
    EmptyEndpointUrl,
    #[error("please enter a model name")]
    EmptyModel,
}

impl LookupSettings {
    /// Trims both fields and rejects empty values. Invalid settings never
    /// reach the orchestrator.
    pub fn validated(mut self) -> Result<Self, SettingsError> {
        self.endpoint_url = self.endpoint_url.trim().to_string();
        self.model = self.model.trim().to_string();
        if self.endpoint_url.is_empty() {
            return Err(SettingsError::EmptyEndpointUrl);
        }
        if self.model.is_empty() {
            return Err(SettingsError::EmptyModel);
        }
        Ok(self)
    }
}

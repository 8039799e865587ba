use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mitigation::error::MitigationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MitigationProviderId {
    /// No service: every run uses the rule-based strategies.
    #[default]
    None,
    Http,
    OpenaiCompat,
}

impl MitigationProviderId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Http => "http",
            Self::OpenaiCompat => "openai-compat",
        }
    }
}

impl std::fmt::Display for MitigationProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MitigationProviderId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "" => Ok(Self::None),
            "http" => Ok(Self::Http),
            "openai-compat" | "openai_compat" | "openai" => Ok(Self::OpenaiCompat),
            _ => Err(format!("unsupported mitigation provider: {value}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpMitigationConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiCompatMitigationConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MitigationConfig {
    #[serde(default)]
    pub provider: MitigationProviderId,
    #[serde(default)]
    pub http: HttpMitigationConfig,
    #[serde(default)]
    pub openai_compat: OpenAiCompatMitigationConfig,
}

impl Default for HttpMitigationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for OpenAiCompatMitigationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
            timeout_ms: default_request_timeout_ms(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl MitigationConfig {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Env override logic with an injectable lookup so tests need not touch
    /// the process environment.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(provider) = get("CHAINRISK_MITIGATION_PROVIDER") {
            match MitigationProviderId::from_str(&provider) {
                Ok(provider) => self.provider = provider,
                Err(error) => tracing::warn!("ignoring CHAINRISK_MITIGATION_PROVIDER: {error}"),
            }
        }
        if let Some(endpoint) = get("CHAINRISK_MITIGATION_URL") {
            self.http.endpoint = Some(endpoint.trim().to_string());
        }
        if self.openai_compat.api_key.as_deref().unwrap_or("").trim().is_empty() {
            if let Some(key) = get("CHAINRISK_LLM_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
                self.openai_compat.api_key = Some(key.trim().to_string());
            }
        }
        if let Some(model) = get("CHAINRISK_LLM_MODEL") {
            self.openai_compat.model = model.trim().to_string();
        }
        if let Some(base_url) = get("CHAINRISK_LLM_BASE_URL") {
            self.openai_compat.base_url = base_url.trim().to_string();
        }
    }

    pub fn effective_api_key(&self) -> Option<String> {
        self.openai_compat
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    pub fn validate_selected_provider(&self) -> Result<(), MitigationError> {
        match self.provider {
            MitigationProviderId::None => {}
            MitigationProviderId::Http => {
                let endpoint = self.http.endpoint.as_deref().unwrap_or("").trim();
                if endpoint.is_empty() {
                    return Err(MitigationError::Config(
                        "http mitigation provider requires endpoint (set mitigation.http.endpoint or CHAINRISK_MITIGATION_URL)"
                            .to_string(),
                    ));
                }
                reqwest::Url::parse(endpoint).map_err(|error| {
                    MitigationError::Config(format!(
                        "invalid mitigation endpoint '{endpoint}': {error}"
                    ))
                })?;
                if self.http.timeout_ms == 0 {
                    return Err(MitigationError::Config(
                        "http mitigation timeout must be greater than 0".to_string(),
                    ));
                }
            }
            MitigationProviderId::OpenaiCompat => {
                if self.effective_api_key().is_none() {
                    return Err(MitigationError::Config(
                        "openai-compat mitigation provider requires apiKey (set mitigation.openaiCompat.apiKey or CHAINRISK_LLM_API_KEY)"
                            .to_string(),
                    ));
                }
                if self.openai_compat.model.trim().is_empty() {
                    return Err(MitigationError::Config(
                        "openai-compat model cannot be empty".to_string(),
                    ));
                }
                if self.openai_compat.timeout_ms == 0 {
                    return Err(MitigationError::Config(
                        "openai-compat timeout must be greater than 0".to_string(),
                    ));
                }
                reqwest::Url::parse(self.openai_compat.base_url.trim()).map_err(|error| {
                    MitigationError::Config(format!(
                        "invalid openai-compat baseUrl '{}': {error}",
                        self.openai_compat.base_url
                    ))
                })?;
            }
        }
        Ok(())
    }
}

fn default_request_timeout_ms() -> u64 {
    20_000
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    1_024
}

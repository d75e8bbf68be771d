//! Chat bot configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Chat bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Tag a chat message must carry to start a new draft; empty accepts all
    #[serde(default = "default_trigger_tag")]
    pub trigger_tag: String,

    /// Name of the category created when the catalog is empty
    #[serde(default = "default_category_name")]
    pub default_category_name: String,

    /// Shared key for `X-Webhook-Hmac` verification; unset disables it
    pub webhook_hmac_key: Option<String>,

    /// Timeout for gateway sends and media downloads, in seconds
    #[serde(default = "default_gateway_timeout")]
    pub gateway_timeout_secs: u64,
}

impl BotConfig {
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_category_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BOT_DEFAULT_CATEGORY_NAME"));
        }
        if self.gateway_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.webhook_hmac_key.as_ref().is_some_and(|k| k.is_empty()) {
            return Err(ValidationError::EmptyWebhookKey);
        }
        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            trigger_tag: default_trigger_tag(),
            default_category_name: default_category_name(),
            webhook_hmac_key: None,
            gateway_timeout_secs: default_gateway_timeout(),
        }
    }
}

fn default_trigger_tag() -> String {
    "#keuangan".to_string()
}

fn default_category_name() -> String {
    "Lainnya".to_string()
}

fn default_gateway_timeout() -> u64 {
    30
}

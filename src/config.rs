use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

/// Immutable process configuration, constructed once at startup and passed by
/// reference into the components that need it. Secrets are never read from the
/// environment anywhere else.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub processor_base_url: String,
    pub processor_api_key: String,
    pub processor_integration_id: String,
    pub webhook_hmac_secret: String,
    pub currency: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        let config = Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            processor_base_url: env::var("PROCESSOR_BASE_URL")
                .unwrap_or_else(|_| "https://accept.paymob.com/api".to_string()),
            processor_api_key: env::var("PROCESSOR_API_KEY")
                .context("PROCESSOR_API_KEY not set")?,
            processor_integration_id: env::var("PROCESSOR_INTEGRATION_ID")
                .context("PROCESSOR_INTEGRATION_ID not set")?,
            webhook_hmac_secret: env::var("WEBHOOK_HMAC_SECRET")
                .context("WEBHOOK_HMAC_SECRET not set")?,
            currency: env::var("CURRENCY").unwrap_or_else(|_| "EGP".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.processor_api_key.trim().is_empty() {
            return Err(anyhow!("PROCESSOR_API_KEY cannot be empty"));
        }

        if self.processor_integration_id.trim().is_empty() {
            return Err(anyhow!("PROCESSOR_INTEGRATION_ID cannot be empty"));
        }

        if self.webhook_hmac_secret.trim().is_empty() {
            return Err(anyhow!("WEBHOOK_HMAC_SECRET cannot be empty"));
        }

        if !self.processor_base_url.starts_with("http://")
            && !self.processor_base_url.starts_with("https://")
        {
            return Err(anyhow!(
                "PROCESSOR_BASE_URL must be an http(s) URL, got {}",
                self.processor_base_url
            ));
        }

        if self.currency.trim().is_empty() {
            return Err(anyhow!("CURRENCY cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            server_port: 3000,
            processor_base_url: "https://processor.example.com/api".to_string(),
            processor_api_key: "api-key".to_string(),
            processor_integration_id: "123456".to_string(),
            webhook_hmac_secret: "hmac-secret".to_string(),
            currency: "EGP".to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = valid_config();
        config.processor_api_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_hmac_secret_rejected() {
        let mut config = valid_config();
        config.webhook_hmac_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let mut config = valid_config();
        config.processor_base_url = "ftp://processor.example.com".to_string();
        assert!(config.validate().is_err());
    }
}

//! Token configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder secret; servers refuse to start with it outside dev mode
pub const DEFAULT_SECRET: &str = "change-me-in-production-at-least-32-bytes";

/// JWT token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens (should be at least 256 bits)
    pub secret: String,
    /// How long an issued token stays valid
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,
    /// Token issuer claim
    pub issuer: String,
    /// Token audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            token_lifetime: Duration::from_secs(30 * 24 * 60 * 60), // 30 days
            issuer: "miniwallet".to_string(),
            audience: "miniwallet-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// True when the signing secret was never replaced
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_parses_humantime() {
        let json = r#"{
            "secret": "s3cret",
            "token_lifetime": "2h 30m",
            "issuer": "i",
            "audience": "a"
        }"#;
        let config: JwtConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.token_lifetime, Duration::from_secs(9000));
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn test_default_is_flagged() {
        assert!(JwtConfig::default().uses_default_secret());
    }
}

//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access-token cookie name
    pub access_cookie_name: String,
    /// Refresh-token cookie name
    pub refresh_cookie_name: String,
    /// Signing secret for access tokens
    pub access_token_secret: Vec<u8>,
    /// Signing secret for refresh tokens (distinct from the access secret)
    pub refresh_token_secret: Vec<u8>,
    /// Access token TTL (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (7 days)
    pub refresh_token_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            access_token_secret: Vec::new(),
            refresh_token_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(15 * 60), // 15 minutes
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl AuthConfig {
    /// Create config with explicit signing secrets
    pub fn new(access_token_secret: Vec<u8>, refresh_token_secret: Vec<u8>) -> Self {
        Self {
            access_token_secret,
            refresh_token_secret,
            ..Default::default()
        }
    }

    /// Create config with random secrets (for development)
    pub fn with_random_secrets() -> Self {
        use rand::RngCore;
        let mut access = [0u8; 32];
        let mut refresh = [0u8; 32];
        rand::rng().fill_bytes(&mut access);
        rand::rng().fill_bytes(&mut refresh);
        Self::new(access.to_vec(), refresh.to_vec())
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Access token TTL in whole seconds (cookie Max-Age)
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_ttl.as_secs() as i64
    }

    /// Refresh token TTL in whole seconds (cookie Max-Age)
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_token_ttl.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls_match_token_lifetimes() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl_secs(), 15 * 60);
        assert_eq!(config.refresh_ttl_secs(), 7 * 24 * 3600);
    }

    #[test]
    fn test_random_secrets_are_distinct() {
        let config = AuthConfig::with_random_secrets();
        assert_eq!(config.access_token_secret.len(), 32);
        assert_eq!(config.refresh_token_secret.len(), 32);
        assert_ne!(config.access_token_secret, config.refresh_token_secret);
    }
}

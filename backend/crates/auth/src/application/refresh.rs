//! Refresh Token Use Case
//!
//! Exchanges a valid refresh token for a new access token. The refresh
//! token itself is not rotated, and nothing is invalidated server-side;
//! the middleware never does this implicitly on an expired access token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenKind, TokenService};
use crate::error::AuthResult;

/// Refresh token use case
pub struct RefreshTokenUseCase {
    tokens: TokenService,
}

impl RefreshTokenUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            tokens: TokenService::new(config),
        }
    }

    /// Verify the refresh token and issue a new access token
    pub fn execute(&self, refresh_token: &str) -> AuthResult<String> {
        let user_id = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        tracing::debug!(user_id = %user_id, "Access token refreshed");

        self.tokens.issue(&user_id, TokenKind::Access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::token::TokenService;
    use crate::error::AuthError;
    use kernel::id::{Id, UserId};

    #[test]
    fn test_refresh_issues_new_access_token() {
        let config = Arc::new(AuthConfig::with_random_secrets());
        let service = TokenService::new(config.clone());
        let user_id: UserId = Id::new();

        let pair = service.issue_pair(&user_id).unwrap();

        let use_case = RefreshTokenUseCase::new(config);
        let access = use_case.execute(&pair.refresh_token).unwrap();

        assert_eq!(service.verify(&access, TokenKind::Access).unwrap(), user_id);
    }

    #[test]
    fn test_access_token_cannot_refresh() {
        let config = Arc::new(AuthConfig::with_random_secrets());
        let service = TokenService::new(config.clone());
        let pair = service.issue_pair(&Id::new()).unwrap();

        let use_case = RefreshTokenUseCase::new(config);
        assert!(matches!(
            use_case.execute(&pair.access_token),
            Err(AuthError::Unauthorized)
        ));
    }
}

//! Token Issuer/Verifier
//!
//! Issues and verifies the signed access/refresh token pair. Both tokens
//! are HS256 JWTs carrying the user id as their sole payload claim; each
//! kind is signed with its own process-wide secret.
//!
//! There is no server-side store of issued tokens: validity is purely a
//! function of signature and expiry.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Which of the two tokens a value claims to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived (15 minutes), sent on every request
    Access,
    /// Long-lived (7 days), used only to obtain a new access token
    Refresh,
}

/// The pair produced at signup/login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT claims: user id plus the standard time bounds
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id (uuid string)
    sub: String,
    /// Issued-at (Unix timestamp, seconds)
    iat: i64,
    /// Expiry (Unix timestamp, seconds)
    exp: i64,
}

/// Token issuer/verifier
#[derive(Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Issue a fresh access/refresh pair for a user
    pub fn issue_pair(&self, user_id: &UserId) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(user_id, TokenKind::Access)?,
            refresh_token: self.issue(user_id, TokenKind::Refresh)?,
        })
    }

    /// Issue a single token of the given kind
    pub fn issue(&self, user_id: &UserId, kind: TokenKind) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let ttl = match kind {
            TokenKind::Access => self.config.access_token_ttl,
            TokenKind::Refresh => self.config.refresh_token_ttl,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )
        .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))
    }

    /// Verify signature and expiry, returning the embedded user id.
    ///
    /// Every failure mode (bad signature, expiry, malformed claims)
    /// collapses to [`AuthError::Unauthorized`].
    pub fn verify(&self, token: &str, kind: TokenKind) -> AuthResult<UserId> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Exact expiry, no clock-skew allowance
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(kind)),
            &validation,
        )
        .map_err(|_| AuthError::Unauthorized)?;

        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::Unauthorized)
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => &self.config.access_token_secret,
            TokenKind::Refresh => &self.config.refresh_token_secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::Id;

    fn service() -> TokenService {
        TokenService::new(Arc::new(AuthConfig::with_random_secrets()))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = service();
        let user_id: UserId = Id::new();

        let pair = service.issue_pair(&user_id).unwrap();

        assert_eq!(
            service.verify(&pair.access_token, TokenKind::Access).unwrap(),
            user_id
        );
        assert_eq!(
            service
                .verify(&pair.refresh_token, TokenKind::Refresh)
                .unwrap(),
            user_id
        );
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        // Distinct secrets: an access token must not verify as a refresh
        // token or vice versa
        let service = service();
        let pair = service.issue_pair(&Id::new()).unwrap();

        assert!(matches!(
            service.verify(&pair.access_token, TokenKind::Refresh),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            service.verify(&pair.refresh_token, TokenKind::Access),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = Arc::new(AuthConfig::with_random_secrets());
        let service = TokenService::new(config.clone());

        // Token signed with the right secret but already past its expiry
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Id::<kernel::id::markers::User>::new().to_string(),
            iat: now - 120,
            exp: now - 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&config.access_token_secret),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token, TokenKind::Access),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let token = service.issue(&Id::new(), TokenKind::Access).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(matches!(
            service.verify(&tampered, TokenKind::Access),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = service();
        let verifier = service(); // different random secrets

        let token = issuer.issue(&Id::new(), TokenKind::Access).unwrap();
        assert!(verifier.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let service = service();
        assert!(service.verify("not.a.jwt", TokenKind::Access).is_err());
        assert!(service.verify("", TokenKind::Refresh).is_err());
    }
}

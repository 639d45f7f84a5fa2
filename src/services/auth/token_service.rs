use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::auth::claims::SessionClaims;

/// Fixed `iss` claim for every session token.
pub const TOKEN_ISSUER: &str = "Zintrix";

/// How long a session token stays valid after issuance.
pub fn session_ttl() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to sign session token")]
    Signing,
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("malformed token")]
    Malformed,
    #[error("bad token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            // A header that announces another algorithm is treated as a forgery.
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

/// Issues and verifies HS256 session tokens.
///
/// - Stateless: verification needs only the token, the clock and the key.
/// - The HMAC comparison is done by `jsonwebtoken`'s backend in constant time.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an injectable clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a session token valid for 24 hours from now.
    pub fn issue(&self, subject: &str, role: &str) -> Result<String, TokenError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issue a session token as if the current time were `now`.
    ///
    /// NumericDate claims carry whole seconds, so `now` is truncated first.
    pub fn issue_at(
        &self,
        subject: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }
        if role.trim().is_empty() {
            return Err(TokenError::EmptyClaim("role"));
        }

        let issued_at = now.trunc_subsecs(0);
        let claims = SessionClaims {
            subject: subject.to_string(),
            role: role.to_string(),
            issued_at,
            expires_at: issued_at + session_ttl(),
            issuer: TOKEN_ISSUER.to_string(),
            token_id: Uuid::new_v4().to_string(),
        };

        debug!(
            sub = %claims.subject,
            role = %claims.role,
            expires_at = %claims.expires_at,
            "issuing session token"
        );

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            TokenError::Signing
        })
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify structure, signature and expiry of `token` at instant `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.subject.trim().is_empty() || claims.role.trim().is_empty() {
            return Err(TokenError::Malformed);
        }
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

//! JWT authentication module.
//!
//! Divvy never sees a password. Clients sign in with an OAuth provider,
//! the provider token is checked through an [`IdentityVerifier`], and the
//! service then issues its own short-lived HS256 tokens for everything
//! that follows.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// User email
    pub email: String,

    /// Display name
    pub name: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// A user as known to Divvy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Identity asserted by the OAuth provider after verifying a client token.
///
/// The subject is the provider's identifier for the account. It is opaque
/// here; [`UserDirectory`] maps it to a Divvy user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub email: String,
    pub name: String,
}

/// Verifies a provider-issued token and returns the identity behind it.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, provider_token: &str) -> ServiceResult<VerifiedIdentity>;
}

/// Looks up (or creates) the Divvy user for a verified identity.
pub trait UserDirectory: Send + Sync {
    fn resolve(&self, identity: &VerifiedIdentity) -> ServiceResult<UserProfile>;
}

/// Response returned to a client that completed sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
    issuer: String,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64, issuer: String) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
            issuer,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_token(&self, user: &UserProfile) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token, checking signature, expiry and issuer.
    pub fn validate_token(&self, token: &str) -> ServiceResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
            _ => ServiceError::AuthFailed(format!("Invalid token: {}", e)),
        })?;

        Ok(token_data.claims)
    }

    /// Lifetime of newly issued tokens in seconds.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }
}

/// Run the full sign-in flow: verify the provider token, resolve the Divvy
/// user behind it and issue an access token.
pub fn authenticate(
    verifier: &dyn IdentityVerifier,
    directory: &dyn UserDirectory,
    jwt: &JwtManager,
    provider_token: &str,
) -> ServiceResult<AuthResponse> {
    let identity = verifier.verify(provider_token)?;
    let user = directory.resolve(&identity)?;
    let access_token = jwt.generate_token(&user)?;
    debug!(user_id = user.id, "issued access token");

    Ok(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: jwt.lifetime_secs(),
        user,
    })
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

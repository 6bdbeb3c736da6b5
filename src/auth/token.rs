use crate::error::AppError;
use crate::models::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims encoded within a session token. These carry the whole session
/// state: the user's id, display identity and role.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's unique identifier.
    pub sub: i32,
    /// Display identity (chosen name, or email when no name was set).
    pub name: String,
    /// Account role captured at sign-in.
    pub role: Role,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

/// Generates a signed session token for a user; expires in 24 hours.
///
/// A fresh token is minted on every registration and login, so a pre-auth
/// token can never be carried across into an authenticated session.
/// Requires `JWT_SECRET` in the environment.
pub fn generate_token(user_id: i32, name: &str, role: Role) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        name: name.to_string(),
        role,
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::InternalServerError("JWT_SECRET not set".into()))?;

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token and decodes its claims.
///
/// The HS256 signature is checked against `JWT_SECRET` and the expiry is
/// enforced; a well-formed three-segment token with a readable payload but a
/// wrong or missing signature is rejected like any other invalid token.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::InternalServerError("JWT_SECRET not set".into()))?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

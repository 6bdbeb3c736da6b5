pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use crate::models::Role;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::{AdminUser, CurrentUser};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, validate_password_strength, verify_password};
pub use token::{generate_token, verify_token, Claims};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Must be a valid email format; checked before any database access.
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Payload for a new registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    /// Checked against the account password policy (12+ chars, mixed case,
    /// digit, special character).
    #[validate(custom = "validate_password_strength")]
    pub password: String,
    /// Optional display name. When absent the email is used for display.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: Option<String>,
}

/// Response after successful authentication (login or registration).
///
/// `role` tells the client whether this is an administrator so it can route
/// to the right landing page.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "whatever".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "whatever".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let valid_register = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "StrongP@ssw0rd123".to_string(),
            username: Some("test_user-123".to_string()),
        };
        assert!(valid_register.validate().is_ok());

        // No username at all is fine.
        let anonymous_register = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "StrongP@ssw0rd123".to_string(),
            username: None,
        };
        assert!(anonymous_register.validate().is_ok());

        let invalid_username_register = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "StrongP@ssw0rd123".to_string(),
            username: Some("test user!".to_string()), // Contains space and exclamation
        };
        assert!(invalid_username_register.validate().is_err());

        let short_username_register = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "StrongP@ssw0rd123".to_string(),
            username: Some("tu".to_string()),
        };
        assert!(short_username_register.validate().is_err());
    }

    #[test]
    fn test_register_request_enforces_password_policy() {
        for weak in [
            "Sh0rt!pw",          // far too short
            "alllowercase1!x",   // no uppercase
            "ALLUPPERCASE1!X",   // no lowercase
            "NoDigitsHere!!!",   // no digit
            "NoSpecials12345",   // no special character
        ] {
            let request = RegisterRequest {
                email: "test@example.com".to_string(),
                password: weak.to_string(),
                username: None,
            };
            assert!(
                request.validate().is_err(),
                "password {:?} should have been rejected",
                weak
            );
        }
    }
}

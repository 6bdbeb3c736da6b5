use crate::{
    auth::{
        generate_token, hash_password, middleware::SESSION_COOKIE, verify_password, AuthResponse,
        LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::{Role, UserRepository},
};
use actix_web::{cookie::Cookie, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Every failed login reports this, whatever actually went wrong: unknown
/// email, disabled account or wrong password must not be distinguishable.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_owned())
        .path("/")
        .http_only(true)
        .finish()
}

/// Register a new user
///
/// Validates the email format, the password policy and the optional display
/// name, refuses an already-registered email, then creates an active regular
/// account and opens a session for it.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let users = UserRepository::new(pool.get_ref().clone());

    if users.find_by_email(&register_data.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password)?;
    let user_id = users
        .create(
            &register_data.email,
            &password_hash,
            register_data.username.as_deref(),
        )
        .await?;

    // Display identity: chosen name when present, email otherwise.
    let display_name = register_data
        .username
        .as_deref()
        .unwrap_or(&register_data.email);

    // A brand-new token: nothing from before the registration survives
    // into the authenticated session.
    let token = generate_token(user_id, display_name, Role::User)?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&token))
        .json(AuthResponse {
            token,
            user_id,
            role: Role::User,
        }))
}

/// Login user
///
/// Authenticates by email and password and opens a session. The response
/// carries the account role so clients can route administrators to their
/// dashboard.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Email format is checked before any database access.
    login_data.validate()?;

    let users = UserRepository::new(pool.get_ref().clone());

    let user = match users.find_by_email(&login_data.email).await? {
        Some(user) => user,
        None => return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
    };

    // A disabled account fails exactly like a bad password.
    if !user.active {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    if !verify_password(&login_data.password, &user.pwd)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = generate_token(user.id, user.display_name(), user.role)?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(AuthResponse {
            token,
            user_id: user.id,
            role: user.role,
        }))
}

/// Logout
///
/// Unconditionally discards the session cookie. Bearer clients simply drop
/// their token.
#[post("/logout")]
pub async fn logout() -> impl Responder {
    let mut cookie = session_cookie("");
    cookie.make_removal();
    HttpResponse::NoContent().cookie(cookie).finish()
}

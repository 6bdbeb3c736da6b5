use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;
use crate::models::Role;

/// The authenticated identity for the current request, extracted from the
/// claims that `AuthMiddleware` verified and stored in request extensions.
///
/// Fails with 401 when no claims are present (middleware not applied or the
/// route was reached unauthenticated).
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub name: String,
    pub role: Role,
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(CurrentUser {
                id: claims.sub,
                name: claims.name.clone(),
                role: claims.role,
            })),
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

/// An authenticated identity that must also hold the admin role.
///
/// The two failure modes stay distinct: no identity at all is 401, an
/// authenticated non-admin is 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        match claims {
            Some(claims) => match claims.role {
                Role::Admin => ready(Ok(AdminUser(CurrentUser {
                    id: claims.sub,
                    name: claims.name,
                    role: claims.role,
                }))),
                Role::User => {
                    let err = AppError::Forbidden("Admin access required".to_string());
                    ready(Err(err.into()))
                }
            },
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: 123,
            name: "tester".to_string(),
            role,
            exp: 4_000_000_000,
            iat: 0,
        }
    }

    #[actix_rt::test]
    async fn test_current_user_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(Role::User));

        let mut payload = Payload::None;
        let user = CurrentUser::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(user.id, 123);
        assert_eq!(user.name, "tester");
        assert_eq!(user.role, Role::User);
    }

    #[actix_rt::test]
    async fn test_current_user_extractor_missing_claims() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let result = CurrentUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_admin_extractor_accepts_admin() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(Role::Admin));

        let mut payload = Payload::None;
        let admin = AdminUser::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(admin.0.id, 123);
    }

    #[actix_rt::test]
    async fn test_admin_extractor_rejects_regular_user_with_403() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(Role::User));

        let mut payload = Payload::None;
        let result = AdminUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::{entities::token::Claims, errors::AuthError};

/// The verified caller. `AuthMiddleware` puts the claims into the request
/// extensions; a missing entry or a non-UUID subject answers 401.
/// Usage: add `auth: AuthClaims` as a handler parameter.
#[derive(Debug, Clone)]
pub struct AuthClaims {
    pub user_id: Uuid,
    pub claims: Claims,
}

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<Claims>() {
            Some(claims) => claims
                .user_id()
                .map(|user_id| AuthClaims { user_id, claims: claims.clone() })
                .map_err(actix_web::Error::from),
            None => Err(AuthError::MissingCredentials.into()),
        };

        ready(result)
    }
}

use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::token::Claims, errors::AuthError, AppState};

/// Verifies the bearer token on every non-public route and stores the
/// decoded [`Claims`] in the request extensions.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method().as_str()) {
                return service.call(req).await;
            }

            let claims = match get_valid_claims(&req) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::warn!(path = %req.path(), error = %e, "Rejected unauthenticated request");
                    return Err(e.into());
                }
            };

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    matches!(
        (path, method),
        ("/", "GET") |
        ("/health", "GET") |
        ("/api/matched-swaps", "GET")
    )
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    let from_header = req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        });

    // EventSource cannot send headers, so the feed also takes the token as a query parameter.
    from_header.or_else(|| {
        if !req.path().starts_with("/api/feed/") {
            return None;
        }
        web::Query::<TokenQuery>::from_query(req.query_string())
            .ok()
            .map(|q| q.into_inner().access_token)
    })
}

#[derive(serde::Deserialize)]
struct TokenQuery {
    access_token: String,
}

fn get_valid_claims(req: &ServiceRequest) -> Result<Claims, AuthError> {
    let state = req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in middleware");
            AuthError::NotConfigured
        })?;

    let token_service = state.token_service()?;
    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    let decoded = token_service.decode_jwt(&token)?;

    decoded.claims.user_id()?;
    Ok(decoded.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_banner_health_and_explore_are_public() {
        assert!(is_public_route("/", "GET"));
        assert!(is_public_route("/health", "GET"));
        assert!(is_public_route("/api/matched-swaps", "GET"));
        assert!(is_public_route("/api/skills", "OPTIONS"));

        assert!(!is_public_route("/api/skills", "GET"));
        assert!(!is_public_route("/api/matched-swaps", "POST"));
        assert!(!is_public_route("/api/messages", "POST"));
    }
}

use crate::auth::jwt::verify_token;
use crate::error::HttpAppError;
use atrium_core::{AppError, BaseConfig};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Credentials accepted by the gate in front of mutating routes
#[derive(Clone, Default)]
pub struct AuthState {
    pub admin_api_key: Option<String>,
    pub jwt_secret: Option<String>,
}

impl AuthState {
    pub fn from_config(config: &BaseConfig) -> Self {
        Self {
            admin_api_key: config.admin_api_key.clone(),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    /// Accept the admin key or a valid HS256 token.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        if let Some(key) = &self.admin_api_key {
            if secure_compare(token, key) {
                tracing::debug!(method = "api_key", "Request authenticated");
                return Ok(());
            }
        }

        if let Some(secret) = &self.jwt_secret {
            let claims = verify_token(secret, token)?;
            tracing::debug!(method = "jwt", subject = %claims.sub, "Request authenticated");
            return Ok(());
        }

        Err(AppError::Unauthorized("Invalid API key".to_string()))
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::warn!(reason = "missing_header", "Authentication failed");
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        tracing::warn!(reason = "invalid_format", "Authentication failed");
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    match auth_state.authenticate(token.trim()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(reason = "invalid_credentials", "Authentication failed");
            HttpAppError(e).into_response()
        }
    }
}

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::{error::AppError, state::AppState};

/// Header carrying the shared admin secret
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Reject mutating requests that don't present the configured admin token.
///
/// With no token configured every request passes.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = &state.admin_token else {
        return Ok(next.run(request).await);
    };

    let path = request.uri().path().to_owned();
    let provided = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match provided {
        Some(token) if token_matches(&token, expected) => {
            debug!(path = %path, "Admin token accepted");
            Ok(next.run(request).await)
        }
        Some(_) => {
            warn!(path = %path, "Invalid admin token");
            Err(AppError::Unauthorized)
        }
        None => {
            warn!(path = %path, "Missing admin token");
            Err(AppError::Unauthorized)
        }
    }
}

/// Constant-time comparison of a presented token against the admin secret
fn token_matches(provided: &str, expected: &SecretString) -> bool {
    provided
        .as_bytes()
        .ct_eq(expected.expose_secret().as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn test_token_matches_exact_value() {
        assert!(token_matches("admin-secret", &secret("admin-secret")));
    }

    #[test]
    fn test_token_same_length_wrong_value_rejected() {
        assert!(!token_matches("admin-secreT", &secret("admin-secret")));
        assert!(!token_matches("xdmin-secret", &secret("admin-secret")));
    }

    #[test]
    fn test_token_prefix_and_extension_rejected() {
        assert!(!token_matches("admin", &secret("admin-secret")));
        assert!(!token_matches("admin-secret2", &secret("admin-secret")));
        assert!(!token_matches("", &secret("admin-secret")));
    }
}

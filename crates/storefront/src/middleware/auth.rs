//! Admin authentication extractor.
//!
//! The admin area is gated by the business's shared password. There are no
//! sessions: every admin request carries the password in a header and is
//! checked against the current business configuration.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use dulsan_core::BusinessConfig;
use dulsan_core::access::WRONG_PASSWORD_MESSAGE;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Extractor that requires the admin password.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdmin) -> impl IntoResponse {
///     "Hello, admin!"
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let config = state.data().config();
        check_password(&parts.headers, &config).map(|()| Self)
    }
}

fn check_password(headers: &HeaderMap, config: &BusinessConfig) -> Result<(), AppError> {
    let candidate = headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Admin password required".to_string()))?;

    if config.admin_password_matches(candidate) {
        Ok(())
    } else {
        tracing::warn!("Rejected admin request with wrong password");
        Err(AppError::Unauthorized(WRONG_PASSWORD_MESSAGE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use dulsan_core::defaults;

    use super::*;

    #[test]
    fn test_password_header() {
        let config = defaults::business_config();
        let mut headers = HeaderMap::new();
        assert!(matches!(
            check_password(&headers, &config),
            Err(AppError::Unauthorized(_))
        ));

        headers.insert(ADMIN_PASSWORD_HEADER, HeaderValue::from_static("wrong"));
        let err = check_password(&headers, &config).expect_err("wrong password");
        assert_eq!(err.to_string(), "Unauthorized: Contraseña incorrecta");

        headers.insert(ADMIN_PASSWORD_HEADER, HeaderValue::from_static("admin123"));
        assert!(check_password(&headers, &config).is_ok());
    }
}

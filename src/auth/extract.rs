use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use tracing::warn;

use crate::auth::token::{Claims, TokenKeys};
use crate::error::ApiError;

/// Name of the cookie carrying the signed login token.
pub const AUTH_COOKIE: &str = "authToken";

/// Builds the `Set-Cookie` value for a freshly issued token. The cookie is
/// HttpOnly so scripts in the browser never see the token.
pub fn auth_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{AUTH_COOKIE}={token}; HttpOnly; Max-Age={max_age_secs}; Path=/")
}

fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == AUTH_COOKIE).then(|| value.to_string())
        })
}

/// Extractor for routes behind login. Pulls the token out of the request
/// cookies and verifies the signature before the handler runs.
pub struct AuthClaims(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
    TokenKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_cookies(&parts.headers).ok_or(ApiError::NotAuthenticated)?;
        let keys = TokenKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|err| {
            warn!(error = %err, "rejected login cookie");
            ApiError::InvalidToken
        })?;
        Ok(AuthClaims(claims))
    }
}

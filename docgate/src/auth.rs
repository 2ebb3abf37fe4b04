//! API-key gate for the document routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Header carrying the client's key. Header names are matched case-insensitively.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests whose `X-API-Key` header is missing, empty or wrong.
///
/// Passes everything through when no key is configured.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if provided.is_empty() || !keys_match(provided, expected) {
        warn!(
            method = %request.method(),
            path = request.uri().path(),
            key_present = !provided.is_empty(),
            "rejected request with invalid API key"
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Compares two keys without stopping at the first differing byte.
fn keys_match(provided: &str, expected: &str) -> bool {
    provided.len() == expected.len()
        && provided
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_must_match_exactly() {
        assert!(keys_match("s3cret", "s3cret"));
        assert!(!keys_match("s3creT", "s3cret"));
        assert!(!keys_match("x3cret", "s3cret"));
        assert!(!keys_match("s3cre", "s3cret"));
        assert!(!keys_match("s3crets", "s3cret"));
        assert!(!keys_match("", "s3cret"));
    }
}

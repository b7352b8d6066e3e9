use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::error::AppError;

/// UserId extractor for owner-facing routes.
///
/// Extracts the owning user's id from the X-User-ID header set by the
/// fronting gateway. Token verification happens upstream; this service only
/// consumes the propagated identity.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::AuthError(anyhow::anyhow!("Missing X-User-ID header"))
            })?;

        // Add to tracing span for observability
        tracing::Span::current().record("user_id", user_id);

        Ok(UserId(user_id.to_string()))
    }
}

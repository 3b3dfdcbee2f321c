//! Admin-gating extractor.
//!
//! Authorization is a single boolean: `profiles.is_admin`. The flag is read
//! from the database on every request (no caching, no role hierarchy), so
//! revoking admin takes effect immediately.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lingua_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the profile's `is_admin` flag. Rejects with 403 Forbidden
/// otherwise; requests without a valid token reject with 401 first.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user.profile.is_admin is guaranteed true here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.profile.is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

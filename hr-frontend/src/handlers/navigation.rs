use axum::{Extension, Json};

use crate::access::{visible_navigation, NavEntry};
use crate::models::AccessContext;

/// Menu entries the caller may open.
///
/// GET /api/navigation
pub async fn get_navigation(Extension(access): Extension<AccessContext>) -> Json<Vec<NavEntry>> {
    Json(visible_navigation(&access))
}

//! Role editor endpoints.
//!
//! The browser keeps the permission array between calls; `resolve` applies
//! one toggle to it and create/update persist it through the role store.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    Extension,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::collections::BTreeMap;
use validator::Validate;

use crate::access::PermissionSubsection;
use crate::editor::RoleEditor;
use crate::models::{PermissionSet, Role, RoleId};
use crate::services::role_store::DEFAULT_PAGE_SIZE;
use crate::services::{RequestContext, RoleFilter, RolePage, RoleQuery};
use crate::AppState;

const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub subsections: &'static [PermissionSubsection],
    pub defaults: &'static PermissionSet,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResolveAction {
    Toggle {
        code: String,
    },
    Group {
        #[serde(rename = "moduleName")]
        module_name: String,
        enabling: bool,
    },
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub permissions: PermissionSet,
    pub action: ResolveAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub permissions: PermissionSet,
    pub full_access: BTreeMap<String, bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetails {
    #[serde(flatten)]
    pub role: Role,
    pub full_access: BTreeMap<String, bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    /// Defaults are used when absent.
    pub permissions: Option<PermissionSet>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub permissions: Option<PermissionSet>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Subsections and defaults for rendering the editor.
///
/// GET /api/permissions/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        subsections: state.catalog.subsections(),
        defaults: state.catalog.defaults(),
    })
}

/// Apply one checkbox change to the browser's current permission array.
///
/// POST /api/roles/resolve
pub async fn resolve_permissions(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Json<ResolveResponse> {
    let mut editor = RoleEditor::with_permissions(state.catalog, req.permissions);

    match &req.action {
        ResolveAction::Toggle { code } => {
            editor.toggle_permission(code);
        }
        ResolveAction::Group {
            module_name,
            enabling,
        } => {
            editor.toggle_subsection(module_name, *enabling);
        }
    }

    Json(ResolveResponse {
        full_access: editor.full_access(),
        permissions: editor.permissions().clone(),
    })
}

/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<RolePage>, AppError> {
    let query = RoleQuery {
        page: params.page.unwrap_or(1).max(1),
        size: params
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
        filter: RoleFilter {
            name: params.name.filter(|n| !n.trim().is_empty()),
        },
    };

    let page = state.role_store.list(&ctx, &query).await?;
    Ok(Json(page))
}

/// Role as the editor would open it: the stored permissions after the
/// post-processing pass, so `RORG` shows up next to role management even when
/// the stored set lacks it.
///
/// GET /api/roles/:id
pub async fn get_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Json<RoleDetails>, AppError> {
    let role = state.role_store.get(&ctx, &RoleId(id)).await?;
    let editor = RoleEditor::edit(state.catalog, role.clone());

    Ok(Json(RoleDetails {
        full_access: editor.full_access(),
        role: Role {
            permissions: editor.permissions().clone(),
            ..role
        },
    }))
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<Role>), AppError> {
    req.validate()?;

    let mut editor = match req.permissions {
        Some(permissions) => RoleEditor::with_permissions(state.catalog, permissions),
        None => RoleEditor::new_role(state.catalog),
    };
    editor.set_name(req.name);
    editor.set_description(req.description);

    let role = editor.submit(state.role_store.as_ref(), &ctx).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// PUT /api/roles/:id
pub async fn update_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<Role>, AppError> {
    req.validate()?;

    let existing = state.role_store.get(&ctx, &RoleId(id)).await?;
    let mut editor = RoleEditor::edit(state.catalog, existing);

    if let Some(name) = req.name {
        editor.set_name(name);
    }
    if let Some(description) = req.description {
        editor.set_description(description);
    }
    if let Some(permissions) = req.permissions {
        editor.set_permissions(permissions);
    }

    let role = editor.submit(state.role_store.as_ref(), &ctx).await?;
    Ok(Json(role))
}

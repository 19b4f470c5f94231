//! One role editing session: local permission state until submit.

use metrics::counter;
use service_core::error::AppError;
use std::collections::BTreeMap;
use thiserror::Error;

use super::subscription::{ListenerRegistry, Subscription};
use crate::access::{PermissionCatalog, PermissionResolver};
use crate::models::{Permission, PermissionSet, Role, RoleId, RolePayload};
use crate::services::{ClientError, RequestContext, RoleStore};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Role name is required")]
    MissingName,

    #[error("Role store rejected the role: {0}")]
    Store(#[from] ClientError),
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::MissingName => {
                AppError::BadRequest(anyhow::anyhow!("Role name is required"))
            }
            EditorError::Store(e) => e.into(),
        }
    }
}

pub struct RoleEditor<'a> {
    resolver: PermissionResolver<'a>,
    role_id: Option<RoleId>,
    loaded_name: Option<String>,
    name: String,
    description: String,
    permissions: PermissionSet,
    listeners: ListenerRegistry<PermissionSet>,
}

impl<'a> RoleEditor<'a> {
    /// Unsaved role seeded with the catalog's default permissions.
    pub fn new_role(catalog: &'a PermissionCatalog) -> Self {
        Self::with_permissions(catalog, catalog.defaults().clone())
    }

    /// Unsaved role holding the defaults plus `permissions` and their
    /// requirements. Unknown codes are dropped.
    pub fn with_permissions(catalog: &'a PermissionCatalog, permissions: PermissionSet) -> Self {
        let resolver = PermissionResolver::new(catalog);
        let resolved = resolver.replace_with(
            catalog.defaults(),
            permissions.iter().map(Permission::as_str),
        );
        Self::hydrate(resolver, resolved)
    }

    /// Session over a stored role. The stored set is taken as is apart from
    /// the post-processing pass.
    pub fn edit(catalog: &'a PermissionCatalog, role: Role) -> Self {
        let resolver = PermissionResolver::new(catalog);
        let mut editor = Self::hydrate(resolver, resolver.apply_invariants(role.permissions));
        editor.role_id = Some(role.id);
        editor.loaded_name = Some(role.name.clone());
        editor.name = role.name;
        editor.description = role.description;
        editor
    }

    pub fn role_id(&self) -> Option<&RoleId> {
        self.role_id.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replace the whole set, e.g. with a set the browser resolved already.
    /// Defaults already held stay, unknown codes are dropped and missing
    /// requirements are granted.
    pub fn set_permissions(&mut self, permissions: PermissionSet) -> &PermissionSet {
        let next = self.resolver.replace_with(
            &self.permissions,
            permissions.iter().map(Permission::as_str),
        );
        self.replace_permissions(next)
    }

    pub fn toggle_permission(&mut self, code: &str) -> &PermissionSet {
        let next = self.resolver.toggle_single(&self.permissions, code);
        self.replace_permissions(next)
    }

    pub fn toggle_subsection(&mut self, module_name: &str, enabling: bool) -> &PermissionSet {
        let next = self
            .resolver
            .toggle_subsection(&self.permissions, enabling, module_name);
        self.replace_permissions(next)
    }

    pub fn is_full_access(&self, module_name: &str) -> bool {
        self.resolver.is_full_access(&self.permissions, module_name)
    }

    /// Full-access state of every subsection, keyed by module name.
    pub fn full_access(&self) -> BTreeMap<String, bool> {
        self.resolver
            .catalog()
            .subsections()
            .iter()
            .map(|s| (s.module_name.clone(), self.is_full_access(&s.module_name)))
            .collect()
    }

    /// Register a listener for permission changes. It stays registered until
    /// the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PermissionSet) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// What [`submit`](Self::submit) sends. Updates leave `name` out unless
    /// it was changed.
    pub fn payload(&self) -> RolePayload {
        let renamed = self.loaded_name.as_deref() != Some(self.name.as_str());
        RolePayload {
            name: (self.role_id.is_none() || renamed).then(|| self.name.clone()),
            description: self.description.clone(),
            permissions: self.permissions.to_vec(),
        }
    }

    /// Create or update the role. On failure nothing local changes, so the
    /// same submit can be retried.
    pub async fn submit(
        &mut self,
        store: &dyn RoleStore,
        ctx: &RequestContext,
    ) -> Result<Role, EditorError> {
        if self.name.trim().is_empty() {
            return Err(EditorError::MissingName);
        }

        let payload = self.payload();
        let (operation, result) = match &self.role_id {
            None => ("create", store.create(ctx, &payload).await),
            Some(id) => ("update", store.update(ctx, id, &payload).await),
        };

        match result {
            Ok(role) => {
                counter!("role_submissions_total", "operation" => operation, "outcome" => "success")
                    .increment(1);
                tracing::info!(
                    role_id = %role.id,
                    operation,
                    permissions = role.permissions.len(),
                    "Role saved"
                );
                self.role_id = Some(role.id.clone());
                self.loaded_name = Some(role.name.clone());
                Ok(role)
            }
            Err(e) => {
                counter!("role_submissions_total", "operation" => operation, "outcome" => "failure")
                    .increment(1);
                tracing::warn!(error = %e, operation, "Role submit failed");
                Err(EditorError::Store(e))
            }
        }
    }

    fn hydrate(resolver: PermissionResolver<'a>, permissions: PermissionSet) -> Self {
        Self {
            resolver,
            role_id: None,
            loaded_name: None,
            name: String::new(),
            description: String::new(),
            permissions,
            listeners: ListenerRegistry::new(),
        }
    }

    fn replace_permissions(&mut self, next: PermissionSet) -> &PermissionSet {
        if next != self.permissions {
            self.permissions = next;
            self.listeners.notify(&self.permissions);
        }
        &self.permissions
    }
}

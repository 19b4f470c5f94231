#![allow(dead_code)]

use async_trait::async_trait;
use hr_frontend::access::HR_CATALOG;
use hr_frontend::models::{FeatureToggles, Role, RoleId, RolePayload, User};
use hr_frontend::services::{
    ClientError, RequestContext, RolePage, RoleQuery, RoleStore, SessionSource,
};
use hr_frontend::AppState;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const VIEWER_TOKEN: &str = "viewer-token";
pub const STAFF_TOKEN: &str = "staff-token";

pub fn role(id: &str, name: &str, codes: &[&str]) -> Role {
    Role {
        id: RoleId(id.to_string()),
        name: name.to_string(),
        description: String::new(),
        permissions: codes.iter().copied().collect(),
    }
}

pub fn user(employee_id: &str, roles: Vec<Role>) -> User {
    User {
        employee_id: employee_id.to_string(),
        roles,
    }
}

/// Role store kept in memory; can be switched to reject every write.
#[derive(Default)]
pub struct InMemoryRoleStore {
    roles: Mutex<HashMap<String, Role>>,
    next_id: AtomicU64,
    failing: AtomicBool,
    pub payloads: Mutex<Vec<RolePayload>>,
}

impl InMemoryRoleStore {
    pub fn with_roles(roles: Vec<Role>) -> Self {
        let store = Self::default();
        {
            let mut map = store.roles.lock().unwrap();
            for role in roles {
                map.insert(role.id.0.clone(), role);
            }
        }
        store.next_id.store(100, Ordering::SeqCst);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self, id: &str) -> Option<Role> {
        self.roles.lock().unwrap().get(id).cloned()
    }

    pub fn last_payload(&self) -> Option<RolePayload> {
        self.payloads.lock().unwrap().last().cloned()
    }

    fn check_failing(&self) -> Result<(), ClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "role store down".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn create(
        &self,
        _ctx: &RequestContext,
        payload: &RolePayload,
    ) -> Result<Role, ClientError> {
        self.payloads.lock().unwrap().push(payload.clone());
        self.check_failing()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let role = Role {
            id: RoleId(id.clone()),
            name: payload.name.clone().unwrap_or_default(),
            description: payload.description.clone(),
            permissions: payload.permissions.iter().cloned().collect(),
        };
        self.roles.lock().unwrap().insert(id, role.clone());
        Ok(role)
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        id: &RoleId,
        payload: &RolePayload,
    ) -> Result<Role, ClientError> {
        self.payloads.lock().unwrap().push(payload.clone());
        self.check_failing()?;

        let mut roles = self.roles.lock().unwrap();
        let role = roles
            .get_mut(&id.0)
            .ok_or_else(|| ClientError::NotFound(format!("/roles/{}", id)))?;
        if let Some(name) = &payload.name {
            role.name = name.clone();
        }
        role.description = payload.description.clone();
        role.permissions = payload.permissions.iter().cloned().collect();
        Ok(role.clone())
    }

    async fn get(&self, _ctx: &RequestContext, id: &RoleId) -> Result<Role, ClientError> {
        self.stored(&id.0)
            .ok_or_else(|| ClientError::NotFound(format!("/roles/{}", id)))
    }

    async fn list(
        &self,
        _ctx: &RequestContext,
        query: &RoleQuery,
    ) -> Result<RolePage, ClientError> {
        let mut items: Vec<Role> = self
            .roles
            .lock()
            .unwrap()
            .values()
            .filter(|r| {
                query
                    .filter
                    .name
                    .as_deref()
                    .map_or(true, |name| r.name.contains(name))
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        let total = items.len() as u64;
        let start = ((query.page - 1) * query.size) as usize;
        let items = items.into_iter().skip(start).take(query.size as usize).collect();
        Ok(RolePage { items, total })
    }
}

/// Session source answering from fixed users keyed by bearer token.
#[derive(Default)]
pub struct StaticSessionSource {
    users: HashMap<String, User>,
    features: FeatureToggles,
}

impl StaticSessionSource {
    pub fn new(features: &[(&str, bool)]) -> Self {
        Self {
            users: HashMap::new(),
            features: features.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    pub fn with_user(mut self, token: &str, user: User) -> Self {
        self.users.insert(token.to_string(), user);
        self
    }
}

#[async_trait]
impl SessionSource for StaticSessionSource {
    async fn current_user(&self, ctx: &RequestContext) -> Result<User, ClientError> {
        ctx.access_token
            .as_ref()
            .and_then(|token| self.users.get(token))
            .cloned()
            .ok_or_else(|| ClientError::Status {
                status: StatusCode::UNAUTHORIZED,
                body: "unknown token".to_string(),
            })
    }

    async fn feature_toggles(&self, _ctx: &RequestContext) -> Result<FeatureToggles, ClientError> {
        Ok(self.features.clone())
    }
}

/// Admin can do everything with roles, the viewer can only read them and
/// staff only see their own documents.
pub fn default_session() -> StaticSessionSource {
    StaticSessionSource::new(&[("loans", true)])
        .with_user(
            ADMIN_TOKEN,
            user(
                "E-1",
                vec![role("1", "Administrators", &["RORG", "CRORG", "URORG", "DRORG", "RLN"])],
            ),
        )
        .with_user(VIEWER_TOKEN, user("E-2", vec![role("2", "Auditors", &["RORG"])]))
        .with_user(STAFF_TOKEN, user("E-3", vec![role("3", "Staff", &["RDM"])]))
}

pub fn test_state(store: Arc<InMemoryRoleStore>) -> AppState {
    AppState::new(Arc::new(default_session()), store, &HR_CATALOG)
}

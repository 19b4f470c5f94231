//! Session user and feature toggles, as supplied by the backend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{PermissionSet, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub employee_id: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    /// Union of the permissions of every assigned role.
    pub fn effective_permissions(&self) -> PermissionSet {
        self.roles
            .iter()
            .flat_map(|role| role.permissions.iter().cloned())
            .collect()
    }
}

/// Organization-level feature switches. Unknown keys read as disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureToggles(HashMap<String, bool>);

impl FeatureToggles {
    pub fn is_enabled(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }
}

impl FromIterator<(String, bool)> for FeatureToggles {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Read-only snapshot of who is asking and which features are on.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    pub user: Option<User>,
    pub features: FeatureToggles,
}

impl AccessContext {
    pub fn new(user: Option<User>, features: FeatureToggles) -> Self {
        Self { user, features }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleId;
    use serde_json::json;

    fn role(id: &str, codes: &[&str]) -> Role {
        Role {
            id: RoleId(id.to_string()),
            name: format!("role-{}", id),
            description: String::new(),
            permissions: codes.iter().copied().collect(),
        }
    }

    #[test]
    fn test_effective_permissions_is_union() {
        let user = User {
            employee_id: "E-1".to_string(),
            roles: vec![role("1", &["REMP", "RDM"]), role("2", &["RDM", "GCON"])],
        };
        let effective = user.effective_permissions();
        assert_eq!(effective.len(), 3);
        assert!(effective.contains_all(["REMP", "RDM", "GCON"]));
    }

    #[test]
    fn test_user_deserializes_camel_case() {
        let user: User = serde_json::from_value(json!({ "employeeId": "E-9" })).unwrap();
        assert_eq!(user.employee_id, "E-9");
        assert!(user.roles.is_empty());
    }

    #[test]
    fn test_missing_toggle_is_disabled() {
        let toggles: FeatureToggles =
            serde_json::from_value(json!({ "loans": true, "recruitment": false })).unwrap();
        assert!(toggles.is_enabled("loans"));
        assert!(!toggles.is_enabled("recruitment"));
        assert!(!toggles.is_enabled("performance"));
    }
}

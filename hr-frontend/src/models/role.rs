//! Role model as exchanged with the role storage endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Permission, PermissionSet};

/// Identifier assigned to a role by the role store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: PermissionSet,
}

/// Body of a create or update call. `name` is left out of updates that do
/// not rename the role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
    pub permissions: Vec<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_omits_unchanged_name() {
        let payload = RolePayload {
            name: None,
            description: "Payroll staff".to_string(),
            permissions: vec![Permission::from("RDM")],
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "description": "Payroll staff", "permissions": ["RDM"] })
        );
    }

    #[test]
    fn test_role_defaults_missing_fields() {
        let role: Role = serde_json::from_value(json!({ "id": "7", "name": "Auditor" })).unwrap();
        assert_eq!(role.id, RoleId("7".to_string()));
        assert!(role.description.is_empty());
        assert!(role.permissions.is_empty());
    }
}

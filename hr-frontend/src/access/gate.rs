//! Access gate: read-only checks against the session user and feature toggles.
//!
//! Every check fails closed. A missing user, a user without roles or an
//! unknown feature key all deny.

use crate::models::{AccessContext, FeatureToggles, User};

/// Exact-match membership in the union of the user's role permissions.
pub fn has_permission(user: Option<&User>, required: &str) -> bool {
    user.map(|u| u.roles.iter().any(|role| role.permissions.contains(required)))
        .unwrap_or(false)
}

pub fn has_feature(toggles: &FeatureToggles, key: &str) -> bool {
    toggles.is_enabled(key)
}

pub fn is_route_allowed(
    user: Option<&User>,
    required_permission: &str,
    toggles: &FeatureToggles,
    required_feature: Option<&str>,
) -> bool {
    has_permission(user, required_permission)
        && required_feature.map_or(true, |feature| has_feature(toggles, feature))
}

/// What a screen or endpoint needs. Menu visibility and route guarding both
/// evaluate it through [`is_route_allowed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirement {
    pub permission: &'static str,
    pub feature: Option<&'static str>,
}

impl RouteRequirement {
    pub const fn permission(permission: &'static str) -> Self {
        Self {
            permission,
            feature: None,
        }
    }

    pub const fn with_feature(self, feature: &'static str) -> Self {
        Self {
            feature: Some(feature),
            ..self
        }
    }

    pub fn allows(&self, ctx: &AccessContext) -> bool {
        is_route_allowed(
            ctx.user.as_ref(),
            self.permission,
            &ctx.features,
            self.feature,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, RoleId};

    fn user_with(codes: &[&str]) -> User {
        User {
            employee_id: "E-1".to_string(),
            roles: vec![Role {
                id: RoleId("1".to_string()),
                name: "Staff".to_string(),
                description: String::new(),
                permissions: codes.iter().copied().collect(),
            }],
        }
    }

    fn toggles(pairs: &[(&str, bool)]) -> FeatureToggles {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_no_partial_matching() {
        let user = user_with(&["CRORG"]);
        assert!(has_permission(Some(&user), "CRORG"));
        assert!(!has_permission(Some(&user), "RORG"));
        assert!(!has_permission(Some(&user), "CRO"));
    }

    #[test]
    fn test_route_without_feature_ignores_toggles() {
        let user = user_with(&["REMP"]);
        assert!(is_route_allowed(
            Some(&user),
            "REMP",
            &FeatureToggles::default(),
            None
        ));
    }

    #[test]
    fn test_route_needs_both_checks() {
        let user = user_with(&["RLN"]);
        let on = toggles(&[("loans", true)]);
        let off = toggles(&[("loans", false)]);

        assert!(is_route_allowed(Some(&user), "RLN", &on, Some("loans")));
        assert!(!is_route_allowed(Some(&user), "RLN", &off, Some("loans")));
        assert!(!is_route_allowed(Some(&user), "ULN", &on, Some("loans")));
        assert!(!is_route_allowed(None, "RLN", &on, Some("loans")));
    }

    #[test]
    fn test_requirement_uses_context() {
        let requirement = RouteRequirement::permission("RAPP").with_feature("recruitment");
        let ctx = AccessContext::new(
            Some(user_with(&["RAPP"])),
            toggles(&[("recruitment", true)]),
        );
        assert!(requirement.allows(&ctx));
        assert!(!requirement.allows(&AccessContext::anonymous()));
    }
}

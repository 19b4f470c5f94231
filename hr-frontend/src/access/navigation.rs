//! Navigation menu of the suite and the requirements its screens share with
//! the API route guard.

use serde::Serialize;

use super::gate::RouteRequirement;
use crate::models::AccessContext;

pub const ROLE_READ: RouteRequirement = RouteRequirement::permission("RORG");
pub const ROLE_CREATE: RouteRequirement = RouteRequirement::permission("CRORG");
pub const ROLE_UPDATE: RouteRequirement = RouteRequirement::permission("URORG");

#[derive(Debug, Clone, Copy)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub requirement: RouteRequirement,
}

/// What the browser receives for a visible menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub label: &'static str,
    pub path: &'static str,
}

pub const NAVIGATION: &[NavItem] = &[
    NavItem {
        label: "Employees",
        path: "/employees",
        requirement: RouteRequirement::permission("REMP"),
    },
    NavItem {
        label: "Clients",
        path: "/clients",
        requirement: RouteRequirement::permission("RCLI"),
    },
    NavItem {
        label: "Projects",
        path: "/projects",
        requirement: RouteRequirement::permission("RPRO"),
    },
    NavItem {
        label: "Contracts",
        path: "/contracts",
        requirement: RouteRequirement::permission("GCON"),
    },
    NavItem {
        label: "Loans",
        path: "/loans",
        requirement: RouteRequirement::permission("RLN").with_feature("loans"),
    },
    NavItem {
        label: "Recruitment",
        path: "/recruitment",
        requirement: RouteRequirement::permission("RAPP").with_feature("recruitment"),
    },
    NavItem {
        label: "Performance Reviews",
        path: "/performance-reviews",
        requirement: RouteRequirement::permission("RREV").with_feature("performanceReviews"),
    },
    NavItem {
        label: "Organization",
        path: "/organization",
        requirement: RouteRequirement::permission("RORG"),
    },
    NavItem {
        label: "Roles",
        path: "/organization/roles",
        requirement: ROLE_READ,
    },
    NavItem {
        label: "My Documents",
        path: "/my-documents",
        requirement: RouteRequirement::permission("RDM"),
    },
];

pub fn visible_navigation(ctx: &AccessContext) -> Vec<NavEntry> {
    NAVIGATION
        .iter()
        .filter(|item| item.requirement.allows(ctx))
        .map(|item| NavEntry {
            label: item.label,
            path: item.path,
        })
        .collect()
}

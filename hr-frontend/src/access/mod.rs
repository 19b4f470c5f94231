//! Permission resolution and access gating.

pub mod catalog;
pub mod gate;
pub mod navigation;
pub mod resolver;

pub use catalog::{
    DependencyTable, PermissionCatalog, PermissionEntry, PermissionSubsection, HR_CATALOG,
};
pub use gate::{has_feature, has_permission, is_route_allowed, RouteRequirement};
pub use navigation::{visible_navigation, NavEntry, NavItem, NAVIGATION};
pub use resolver::{is_subsection_full_access, PermissionResolver};

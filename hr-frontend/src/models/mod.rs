pub mod permission;
pub mod role;
pub mod user;

pub use permission::{Permission, PermissionSet};
pub use role::{Role, RoleId, RolePayload};
pub use user::{AccessContext, FeatureToggles, User};

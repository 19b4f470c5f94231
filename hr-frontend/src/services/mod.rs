pub mod backend_client;
pub mod error;
pub mod role_store;
pub mod session;

pub use backend_client::{BackendClient, RequestContext};
pub use error::ClientError;
pub use role_store::{HttpRoleStore, RoleFilter, RolePage, RoleQuery, RoleStore};
pub use session::{HttpSessionSource, SessionSource};

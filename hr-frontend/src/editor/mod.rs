//! Role editing sessions.

pub mod role_editor;
pub mod subscription;

pub use role_editor::{EditorError, RoleEditor};
pub use subscription::{ListenerRegistry, Subscription};

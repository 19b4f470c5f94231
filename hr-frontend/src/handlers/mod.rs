pub mod app;
pub mod metrics;
pub mod navigation;
pub mod roles;

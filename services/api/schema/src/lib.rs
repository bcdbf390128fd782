//! SeaORM entities for the Roombook API service.

pub mod audit_logs;
pub mod events;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod user_roles;
pub mod users;

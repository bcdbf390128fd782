pub mod audit;
pub mod event;
pub mod login;
pub mod rbac;

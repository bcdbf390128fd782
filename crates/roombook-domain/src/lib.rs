//! Domain types shared across the Roombook workspace.
//!
//! Only pure types live here: the closed permission and role sets, audit
//! classifications, and pagination. No framework or storage dependencies.

pub mod audit;
pub mod pagination;
pub mod permission;
pub mod role;

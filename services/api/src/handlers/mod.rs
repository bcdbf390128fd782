pub mod audit;
pub mod auth;
pub mod events;
pub mod health;
pub mod profile;
pub mod roles;
pub mod users;

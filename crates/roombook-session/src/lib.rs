//! Session credential types for Roombook.
//!
//! Provides JWT session mint/validation and the `auth_token` cookie builders.
//! Validation is available everywhere; minting is feature-gated to the API
//! service, the sole credential issuer.

pub mod cookie;
pub mod session;

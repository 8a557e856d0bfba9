//! Vela Core
//!
//! Core library for an infrastructure management tool: the resource model,
//! the provider lifecycle interface, and attribute schemas.

pub mod provider;
pub mod resource;
pub mod schema;

//! Services domain module.
//!
//! This module owns the declarative service definitions: their model, the
//! YAML-backed config store, and the admin operations (CRUD, refresh,
//! test) exposed over HTTP.
//!
//! ## Architecture
//!
//! - `model.rs` - `ServiceDefinition` and its parsed auth/method forms
//! - `store.rs` - Load/save of the definitions file
//! - `admin.rs` - Admin operations and the refresh policy
//! - `routes.rs` - axum routes for the admin API
//! - `error.rs` - Service-specific error types

mod admin;
mod error;
mod model;
pub mod routes;
mod store;

pub use admin::{AdminService, RefreshFailure, RefreshPolicy, RefreshReport};
pub use error::{ServiceError, ServiceResult};
pub use model::{AuthScheme, RequestMethod, RequestSpec, ServiceDefinition, ServicesDocument};
pub use routes::{ApiError, admin_router};
pub use store::ServiceStore;

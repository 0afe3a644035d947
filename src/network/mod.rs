//! Network layer - API calls against the Meditel backend
//!
//! The Network actor receives commands and sends back typed responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::{ApiClient, ApiError};

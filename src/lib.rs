//! # Meditel Console
//!
//! A terminal administrative console for the Meditel healthcare
//! appointment backend.
//!
//! ## Features
//! - Doctor, patient and appointment lists kept in sync with the backend
//! - Create forms with local validation
//! - Live appointment search
//! - Manual sync-to-database and liveness probe
//! - Cancellable requests with a per-request deadline
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod network;
pub mod ui;

// Re-export commonly used types
pub use models::{Appointment, AppointmentStatus, Doctor, Patient};
pub use config::Config;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiClient, ApiError, NetworkActor};

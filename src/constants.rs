//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Default base URL of the Meditel backend
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Default per-request deadline in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log file name (the terminal is owned by the UI)
pub const DEFAULT_LOG_FILE: &str = "meditel.log";

/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "MEDITEL_API_BASE";

/// How long a success banner stays visible
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_millis(3000);

/// Application name
pub const APP_NAME: &str = "Meditel Console";

// User-facing messages
pub const MSG_DATA_LOADED: &str = "Data loaded successfully";
pub const MSG_SYNC_FAILED: &str = "Failed to sync with database";
pub const MSG_CANCELLED: &str = "Request cancelled";

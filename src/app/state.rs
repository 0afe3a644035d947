//! App state - pure data structure with no I/O logic

use std::time::Instant;

use crate::app::forms::CreateForms;
use crate::constants::SUCCESS_BANNER_TTL;
use crate::messages::ui_events::{AppTab, FormField, InputMode};
use crate::messages::RenderState;
use crate::models::{Appointment, Doctor, Patient};

/// Kind of banner message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// The single success/error line shown to the operator
#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    /// Success banners expire; errors stay until dismissed or replaced
    pub expires_at: Option<Instant>,
}

/// The operation a pending request belongs to
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// `announce` is false for the refresh that follows a sync
    Refresh { announce: bool },
    CreateDoctor,
    CreatePatient,
    /// Symptoms as submitted, attached to the local record
    CreateAppointment { symptoms: String },
    Sync,
}

/// The one request the console is waiting on
#[derive(Clone, Debug, PartialEq)]
pub struct PendingOp {
    pub id: u64,
    pub op: Operation,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Navigation
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub focused_field: FormField,
    pub scroll: u16,
    pub show_help: bool,

    // Cached view of the backend
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,

    // Appointment search (recomputed on every keystroke)
    pub search_term: String,

    // Create tab
    pub forms: CreateForms,

    // Request tracking
    pub is_loading: bool,
    pub pending: Option<PendingOp>,
    pub health_probe_id: Option<u64>,
    pub backend_online: Option<bool>,
    pub next_request_id: u64,

    pub banner: Option<Banner>,
    pub api_base: String,
}

impl AppState {
    pub fn new(api_base: impl Into<String>) -> Self {
        AppState {
            active_tab: AppTab::Appointments,
            input_mode: InputMode::Normal,
            focused_field: FormField::DoctorName,
            scroll: 0,
            show_help: false,
            doctors: Vec::new(),
            patients: Vec::new(),
            appointments: Vec::new(),
            search_term: String::new(),
            forms: CreateForms::default(),
            is_loading: false,
            pending: None,
            health_probe_id: None,
            backend_online: None,
            next_request_id: 1,
            banner: None,
            api_base: api_base.into(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    // ========================
    // Banner
    // ========================

    pub fn set_success(&mut self, text: impl Into<String>, now: Instant) {
        self.banner = Some(Banner {
            kind: BannerKind::Success,
            text: text.into(),
            expires_at: Some(now + SUCCESS_BANNER_TTL),
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!(message = %text, "Error banner");
        self.banner = Some(Banner {
            kind: BannerKind::Error,
            text,
            expires_at: None,
        });
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Drop an expired success banner. Returns true if something changed.
    pub fn expire_banner(&mut self, now: Instant) -> bool {
        let expired = self
            .banner
            .as_ref()
            .and_then(|b| b.expires_at)
            .map(|at| now >= at)
            .unwrap_or(false);
        if expired {
            self.banner = None;
        }
        expired
    }

    pub fn error_message(&self) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.kind == BannerKind::Error)
            .map(|b| b.text.as_str())
    }

    pub fn success_message(&self) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.kind == BannerKind::Success)
            .map(|b| b.text.as_str())
    }

    // ========================
    // Search
    // ========================

    /// Appointments whose patient, doctor or symptoms contain `term`,
    /// ignoring case. The empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Appointment> {
        let needle = term.to_lowercase();
        self.appointments
            .iter()
            .filter(|a| needle.is_empty() || a.matches(&needle))
            .collect()
    }

    pub fn filtered_appointments(&self) -> Vec<&Appointment> {
        self.search(&self.search_term)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_tab: self.active_tab,
            input_mode: self.input_mode,
            focused_field: self.focused_field,
            scroll: self.scroll,
            show_help: self.show_help,
            doctors: self.doctors.clone(),
            patients: self.patients.clone(),
            appointments: self.filtered_appointments().into_iter().cloned().collect(),
            total_appointments: self.appointments.len(),
            search_term: self.search_term.clone(),
            forms: self.forms.clone(),
            is_loading: self.is_loading,
            backend_online: self.backend_online,
            banner: self.banner.clone(),
            api_base: self.api_base.clone(),
        }
    }
}

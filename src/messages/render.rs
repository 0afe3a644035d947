//! Render state - data structure sent from App layer to UI for rendering

use crate::app::forms::CreateForms;
use crate::app::state::Banner;
use crate::messages::ui_events::{AppTab, FormField, InputMode};
use crate::models::{Appointment, Doctor, Patient};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Navigation
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub focused_field: FormField,
    pub scroll: u16,
    pub show_help: bool,

    // Collections; appointments are already filtered by the search term
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub total_appointments: usize,
    pub search_term: String,

    pub forms: CreateForms,

    // Status
    pub is_loading: bool,
    pub backend_online: Option<bool>,
    pub banner: Option<Banner>,
    pub api_base: String,
}

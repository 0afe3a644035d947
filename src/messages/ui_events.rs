//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application tabs
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AppTab {
    #[default]
    Appointments,
    Doctors,
    Patients,
    Create,
}

impl AppTab {
    pub const ALL: [AppTab; 4] = [
        AppTab::Appointments,
        AppTab::Doctors,
        AppTab::Patients,
        AppTab::Create,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AppTab::Appointments => "Appointments",
            AppTab::Doctors => "Doctors",
            AppTab::Patients => "Patients",
            AppTab::Create => "Create New",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            AppTab::Appointments => 0,
            AppTab::Doctors => 1,
            AppTab::Patients => 2,
            AppTab::Create => 3,
        }
    }

    pub fn next(&self) -> AppTab {
        AppTab::ALL[(self.index() + 1) % AppTab::ALL.len()]
    }

    pub fn prev(&self) -> AppTab {
        AppTab::ALL[(self.index() + AppTab::ALL.len() - 1) % AppTab::ALL.len()]
    }
}

/// Which create form a field belongs to
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormKind {
    Doctor,
    Patient,
    Appointment,
}

/// Focusable fields of the Create tab, in display order
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum FormField {
    #[default]
    DoctorName,
    DoctorAge,
    DoctorSpecialty,
    DoctorContact,
    PatientName,
    PatientAge,
    PatientSymptoms,
    AppointmentPatient,
    AppointmentSymptoms,
    AppointmentTime,
}

impl FormField {
    const ORDER: [FormField; 10] = [
        FormField::DoctorName,
        FormField::DoctorAge,
        FormField::DoctorSpecialty,
        FormField::DoctorContact,
        FormField::PatientName,
        FormField::PatientAge,
        FormField::PatientSymptoms,
        FormField::AppointmentPatient,
        FormField::AppointmentSymptoms,
        FormField::AppointmentTime,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> FormField {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> FormField {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn kind(&self) -> FormKind {
        match self {
            FormField::DoctorName
            | FormField::DoctorAge
            | FormField::DoctorSpecialty
            | FormField::DoctorContact => FormKind::Doctor,
            FormField::PatientName | FormField::PatientAge | FormField::PatientSymptoms => {
                FormKind::Patient
            }
            FormField::AppointmentPatient
            | FormField::AppointmentSymptoms
            | FormField::AppointmentTime => FormKind::Appointment,
        }
    }

    /// The patient picker is chosen from a list, not typed
    pub fn is_picker(&self) -> bool {
        matches!(self, FormField::AppointmentPatient)
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),
    NextTab,
    PrevTab,
    ScrollUp,
    ScrollDown,

    // Input editing (search box or form field)
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,

    // Create forms
    NextField,
    PrevField,
    NextPatient,
    PrevPatient,
    Submit,

    // Backend operations
    Refresh,
    SyncToDatabase,
    CheckHealth,
    CancelRequest,

    // Banner and popups
    DismissBanner,
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_tab: AppTab,
    focused_field: FormField,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('x') => return Some(UiEvent::CancelRequest),
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            _ => {}
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Editing => handle_editing_keys(key, active_tab),
        InputMode::Normal => handle_normal_keys(key, active_tab, focused_field),
    }
}

fn handle_editing_keys(key: KeyEvent, active_tab: AppTab) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Tab if active_tab == AppTab::Create => Some(UiEvent::NextField),
        KeyCode::BackTab if active_tab == AppTab::Create => Some(UiEvent::PrevField),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn handle_normal_keys(key: KeyEvent, active_tab: AppTab, focused_field: FormField) -> Option<UiEvent> {
    // Keys shared by every tab
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('1') => return Some(UiEvent::SwitchTab(AppTab::Appointments)),
        KeyCode::Char('2') => return Some(UiEvent::SwitchTab(AppTab::Doctors)),
        KeyCode::Char('3') => return Some(UiEvent::SwitchTab(AppTab::Patients)),
        KeyCode::Char('4') => return Some(UiEvent::SwitchTab(AppTab::Create)),
        KeyCode::Char('r') => return Some(UiEvent::Refresh),
        KeyCode::Char('S') => return Some(UiEvent::SyncToDatabase),
        KeyCode::Char('h') => return Some(UiEvent::CheckHealth),
        KeyCode::Esc => return Some(UiEvent::DismissBanner),
        _ => {}
    }

    match active_tab {
        AppTab::Create => match key.code {
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Right if focused_field.is_picker() => Some(UiEvent::NextPatient),
            KeyCode::Left if focused_field.is_picker() => Some(UiEvent::PrevPatient),
            KeyCode::Char('e') | KeyCode::Enter => {
                if focused_field.is_picker() {
                    Some(UiEvent::NextPatient)
                } else {
                    Some(UiEvent::StartEditing)
                }
            }
            KeyCode::Char('s') => Some(UiEvent::Submit),
            _ => None,
        },
        AppTab::Appointments => match key.code {
            KeyCode::Char('/') | KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Char('n') => Some(UiEvent::SwitchTab(AppTab::Create)),
            KeyCode::Tab => Some(UiEvent::NextTab),
            KeyCode::BackTab => Some(UiEvent::PrevTab),
            KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Down => Some(UiEvent::ScrollDown),
            _ => None,
        },
        AppTab::Doctors | AppTab::Patients => match key.code {
            KeyCode::Tab => Some(UiEvent::NextTab),
            KeyCode::BackTab => Some(UiEvent::PrevTab),
            KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Down => Some(UiEvent::ScrollDown),
            _ => None,
        },
    }
}

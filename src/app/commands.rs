//! Command handlers - business logic for processing UI events and responses

use std::time::Instant;

use crate::app::state::{BannerKind, Operation, PendingOp};
use crate::app::AppState;
use crate::constants::{MSG_CANCELLED, MSG_DATA_LOADED, MSG_SYNC_FAILED};
use crate::messages::ui_events::{AppTab, FormKind, InputMode};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::ApiError;

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) {
        self.active_tab = tab;
        self.input_mode = InputMode::Normal;
        self.scroll = 0;
    }

    pub fn next_tab(&mut self) {
        self.switch_tab(self.active_tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.switch_tab(self.active_tab.prev());
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
        if self.focused_field.is_picker() {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
        if self.focused_field.is_picker() {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn next_patient(&mut self) {
        self.forms.appointment.cycle_patient(&self.patients, true);
    }

    pub fn prev_patient(&mut self) {
        self.forms.appointment.cycle_patient(&self.patients, false);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        match self.active_tab {
            AppTab::Appointments => self.input_mode = InputMode::Editing,
            AppTab::Create if !self.focused_field.is_picker() => {
                self.input_mode = InputMode::Editing
            }
            _ => {}
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_tab {
            AppTab::Appointments => Some(&mut self.search_term),
            AppTab::Create => self.forms.field_mut(self.focused_field),
            _ => None,
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(input) = self.current_input_mut() {
            input.push(c);
        }
        if self.active_tab == AppTab::Appointments {
            self.scroll = 0;
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(input) = self.current_input_mut() {
            input.pop();
        }
    }

    // ========================
    // Backend operations
    // ========================

    /// Mark `op` as the pending request and hand out its id.
    /// A stale error banner is cleared when a new operation starts.
    fn begin(&mut self, op: Operation) -> u64 {
        let id = self.next_id();
        self.is_loading = true;
        self.pending = Some(PendingOp { id, op });
        if matches!(self.banner.as_ref().map(|b| b.kind), Some(BannerKind::Error)) {
            self.banner = None;
        }
        id
    }

    fn finish(&mut self) -> Option<Operation> {
        self.is_loading = false;
        self.pending.take().map(|p| p.op)
    }

    /// Replace all three collections from the backend
    pub fn refresh_all(&mut self) -> Option<NetworkCommand> {
        self.start_refresh(true)
    }

    fn start_refresh(&mut self, announce: bool) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        let id = self.begin(Operation::Refresh { announce });
        Some(NetworkCommand::FetchAll { id })
    }

    pub fn create_doctor(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        match self.forms.doctor.to_input() {
            Ok(input) => {
                let id = self.begin(Operation::CreateDoctor);
                Some(NetworkCommand::CreateDoctor { id, input })
            }
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    pub fn create_patient(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        match self.forms.patient.to_input() {
            Ok(input) => {
                let id = self.begin(Operation::CreatePatient);
                Some(NetworkCommand::CreatePatient { id, input })
            }
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    pub fn create_appointment(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        match self.forms.appointment.to_input() {
            Ok(input) => {
                let id = self.begin(Operation::CreateAppointment {
                    symptoms: input.symptoms.clone(),
                });
                Some(NetworkCommand::CreateAppointment { id, input })
            }
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    /// Submit the form owning the focused field
    pub fn submit_form(&mut self) -> Option<NetworkCommand> {
        self.stop_editing();
        match self.focused_field.kind() {
            FormKind::Doctor => self.create_doctor(),
            FormKind::Patient => self.create_patient(),
            FormKind::Appointment => self.create_appointment(),
        }
    }

    pub fn sync_to_database(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        let id = self.begin(Operation::Sync);
        Some(NetworkCommand::SyncToDatabase { id })
    }

    /// Liveness probe; runs beside other operations without touching loading
    pub fn check_health(&mut self) -> Option<NetworkCommand> {
        if self.health_probe_id.is_some() {
            return None;
        }
        let id = self.next_id();
        self.health_probe_id = Some(id);
        Some(NetworkCommand::CheckHealth { id })
    }

    /// Cancel the current pending request
    pub fn cancel_request(&mut self) -> Option<NetworkCommand> {
        self.pending.as_ref().map(|p| NetworkCommand::Cancel(p.id))
    }

    fn connection_error(&self) -> String {
        format!(
            "Failed to connect to backend. Make sure the server is running at {}",
            self.api_base
        )
    }

    /// Message for a failed create: the server's detail, else a generic one
    fn create_error(&self, error: &ApiError, what: &str) -> String {
        if let Some(detail) = error.detail() {
            detail.to_string()
        } else if error.is_unreachable() {
            self.connection_error()
        } else {
            format!("Failed to create {}", what)
        }
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response. May return a follow-up command to issue.
    pub fn handle_response(
        &mut self,
        response: NetworkResponse,
        now: Instant,
    ) -> Option<NetworkCommand> {
        if let NetworkResponse::Health { id, reachable } = response {
            if self.health_probe_id == Some(id) {
                self.health_probe_id = None;
                self.backend_online = Some(reachable);
            }
            return None;
        }

        // Only the pending request may touch state
        let response_id = response.id();
        if self.pending.as_ref().map(|p| p.id) != Some(response_id) {
            tracing::debug!(id = response_id, "Dropping stale response");
            return None;
        }
        let op = self.finish()?;

        match (op, response) {
            (Operation::Refresh { announce }, NetworkResponse::Fetched { snapshot, .. }) => {
                self.doctors = snapshot.doctors;
                self.patients = snapshot.patients;
                self.appointments = snapshot.appointments;
                self.backend_online = Some(true);
                if announce {
                    self.set_success(MSG_DATA_LOADED, now);
                }
                tracing::info!(
                    doctors = self.doctors.len(),
                    patients = self.patients.len(),
                    appointments = self.appointments.len(),
                    "Collections refreshed"
                );
            }
            (Operation::Refresh { .. }, NetworkResponse::Failed { error, .. }) => {
                if error.is_unreachable() {
                    self.backend_online = Some(false);
                    self.set_error(self.connection_error());
                } else {
                    self.set_error(format!("Failed to load data: {}", error));
                }
            }

            (Operation::CreateDoctor, NetworkResponse::DoctorCreated { doctor, .. }) => {
                let id = self.doctors.len() as i64 + 1;
                self.doctors.push(doctor.into_doctor(id));
                self.forms.doctor = Default::default();
                self.switch_tab(AppTab::Doctors);
                self.set_success("Doctor created successfully!", now);
            }
            (Operation::CreateDoctor, NetworkResponse::Failed { error, .. }) => {
                self.set_error(self.create_error(&error, "doctor"));
            }

            (Operation::CreatePatient, NetworkResponse::PatientCreated { patient, .. }) => {
                let id = self.patients.len() as i64 + 1;
                self.patients.push(patient.into_patient(id));
                self.forms.patient = Default::default();
                self.switch_tab(AppTab::Patients);
                self.set_success("Patient created successfully!", now);
            }
            (Operation::CreatePatient, NetworkResponse::Failed { error, .. }) => {
                self.set_error(self.create_error(&error, "patient"));
            }

            (
                Operation::CreateAppointment { symptoms },
                NetworkResponse::AppointmentCreated { appointment, .. },
            ) => {
                let id = self.appointments.len() as i64 + 1;
                let symptoms = Some(symptoms).filter(|s| !s.is_empty());
                self.appointments.push(appointment.into_appointment(id, symptoms));
                self.forms.appointment = Default::default();
                self.switch_tab(AppTab::Appointments);
                self.set_success("Appointment created successfully!", now);
            }
            (Operation::CreateAppointment { .. }, NetworkResponse::Failed { error, .. }) => {
                self.set_error(self.create_error(&error, "appointment"));
            }

            (Operation::Sync, NetworkResponse::Synced { summary, .. }) => {
                self.set_success(
                    format!(
                        "Sync completed: {} doctors, {} patients synced",
                        summary.synced.doctors, summary.synced.patients
                    ),
                    now,
                );
                return self.start_refresh(false);
            }
            (Operation::Sync, NetworkResponse::Failed { .. }) => {
                self.set_error(MSG_SYNC_FAILED);
            }

            (_, NetworkResponse::Cancelled { .. }) => {
                self.set_error(MSG_CANCELLED);
            }

            (op, other) => {
                tracing::warn!(?op, response = ?other, "Response does not match pending operation");
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Appointment, AppointmentBooked, AppointmentStatus, Doctor, DoctorEcho, Patient,
        PatientEcho, Snapshot, SyncCounts, SyncSummary,
    };
    use std::time::Duration;

    const BASE: &str = "http://localhost:8000";

    fn doctor(id: i64, name: &str) -> Doctor {
        Doctor {
            id,
            name: name.to_string(),
            age: 40,
            specialty: "Cardiology".to_string(),
            contact: "a@x.com".to_string(),
        }
    }

    fn patient(id: i64, name: &str) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            age: 30,
            symptoms: None,
        }
    }

    fn pending_id(cmd: &NetworkCommand) -> u64 {
        match cmd {
            NetworkCommand::FetchAll { id }
            | NetworkCommand::CreateDoctor { id, .. }
            | NetworkCommand::CreatePatient { id, .. }
            | NetworkCommand::CreateAppointment { id, .. }
            | NetworkCommand::SyncToDatabase { id }
            | NetworkCommand::CheckHealth { id } => *id,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_refresh_overwrites_collections() {
        let mut state = AppState::new(BASE);
        state.doctors = vec![doctor(7, "Dr. Old"), doctor(8, "Dr. Older")];

        let cmd = state.refresh_all().unwrap();
        assert!(state.is_loading);

        let now = Instant::now();
        let snapshot = Snapshot {
            doctors: vec![doctor(1, "Dr. A")],
            patients: vec![],
            appointments: vec![],
        };
        let follow_up = state.handle_response(
            NetworkResponse::Fetched { id: pending_id(&cmd), snapshot: snapshot.clone() },
            now,
        );

        assert!(follow_up.is_none());
        assert!(!state.is_loading);
        assert_eq!(state.doctors, snapshot.doctors);
        assert_eq!(state.success_message(), Some("Data loaded successfully"));
        assert!(state.expire_banner(now + Duration::from_millis(3000)));
    }

    #[test]
    fn test_failed_refresh_keeps_collections_and_sets_error() {
        let mut state = AppState::new(BASE);
        state.patients = vec![patient(1, "Alice")];

        let cmd = state.refresh_all().unwrap();
        state.handle_response(
            NetworkResponse::Failed {
                id: pending_id(&cmd),
                error: ApiError::Status { status: 500, detail: None },
            },
            Instant::now(),
        );

        assert!(!state.is_loading);
        assert_eq!(state.patients.len(), 1);
        assert_eq!(state.error_message(), Some("Failed to load data: HTTP 500"));
    }

    #[test]
    fn test_unreachable_backend_message() {
        let mut state = AppState::new(BASE);
        let cmd = state.refresh_all().unwrap();
        state.handle_response(
            NetworkResponse::Failed {
                id: pending_id(&cmd),
                error: ApiError::Transport("connection refused".into()),
            },
            Instant::now(),
        );
        assert_eq!(
            state.error_message(),
            Some("Failed to connect to backend. Make sure the server is running at http://localhost:8000")
        );
        assert_eq!(state.backend_online, Some(false));
    }

    #[test]
    fn test_invalid_doctor_issues_no_request() {
        let mut state = AppState::new(BASE);
        state.forms.doctor.name = "Dr. A".into();
        state.forms.doctor.specialty = "Cardiology".into();

        assert!(state.create_doctor().is_none());
        assert!(!state.is_loading);
        assert!(state.doctors.is_empty());
        assert_eq!(state.error_message(), Some("Please fill all required fields"));
    }

    #[test]
    fn test_create_patient_appends_with_local_id() {
        let mut state = AppState::new(BASE);
        state.patients = vec![patient(1, "Alice"), patient(2, "Carol")];
        state.forms.patient.name = "Bob".into();
        state.forms.patient.age = "30".into();
        state.forms.patient.symptoms = "cough".into();

        let cmd = state.create_patient().unwrap();
        match &cmd {
            NetworkCommand::CreatePatient { input, .. } => {
                assert_eq!(input.name, "Bob");
                assert_eq!(input.age, 30);
            }
            other => panic!("unexpected command {:?}", other),
        }

        state.handle_response(
            NetworkResponse::PatientCreated {
                id: pending_id(&cmd),
                patient: PatientEcho {
                    name: "Bob".into(),
                    age: 30,
                    symptoms: Some("cough".into()),
                },
            },
            Instant::now(),
        );

        assert_eq!(state.patients.len(), 3);
        let created = state.patients.last().unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(created.symptoms.as_deref(), Some("cough"));
        assert_eq!(state.forms.patient, Default::default());
        assert_eq!(state.active_tab, AppTab::Patients);
        assert_eq!(state.success_message(), Some("Patient created successfully!"));
    }

    #[test]
    fn test_create_doctor_success() {
        let mut state = AppState::new(BASE);
        state.forms.doctor.name = "Dr. A".into();
        state.forms.doctor.specialty = "Cardiology".into();
        state.forms.doctor.contact = "a@x.com".into();

        let cmd = state.create_doctor().unwrap();
        state.handle_response(
            NetworkResponse::DoctorCreated {
                id: pending_id(&cmd),
                doctor: DoctorEcho {
                    name: "Dr. A".into(),
                    age: 0,
                    specialty: "Cardiology".into(),
                    contact: "a@x.com".into(),
                },
            },
            Instant::now(),
        );
        assert_eq!(state.doctors.len(), 1);
        assert_eq!(state.doctors[0].id, 1);
        assert_eq!(state.active_tab, AppTab::Doctors);
    }

    #[test]
    fn test_appointment_rejection_shows_detail_verbatim() {
        let mut state = AppState::new(BASE);
        state.forms.appointment.patient_name = "Bob".into();
        state.forms.appointment.scheduled_time = "2024-01-15T10:30".into();

        let cmd = state.create_appointment().unwrap();
        state.handle_response(
            NetworkResponse::Failed {
                id: pending_id(&cmd),
                error: ApiError::Status {
                    status: 400,
                    detail: Some("No doctor available".into()),
                },
            },
            Instant::now(),
        );

        assert_eq!(state.error_message(), Some("No doctor available"));
        assert!(state.appointments.is_empty());
        // Form is kept for a retry
        assert_eq!(state.forms.appointment.patient_name, "Bob");
    }

    #[test]
    fn test_create_failure_without_detail_is_generic() {
        let mut state = AppState::new(BASE);
        state.forms.doctor.name = "Dr. A".into();
        state.forms.doctor.specialty = "Cardiology".into();
        state.forms.doctor.contact = "a@x.com".into();

        let cmd = state.create_doctor().unwrap();
        state.handle_response(
            NetworkResponse::Failed {
                id: pending_id(&cmd),
                error: ApiError::Decode("missing field `doctor`".into()),
            },
            Instant::now(),
        );
        assert_eq!(state.error_message(), Some("Failed to create doctor"));
    }

    #[test]
    fn test_appointment_keeps_submitted_symptoms() {
        let mut state = AppState::new(BASE);
        state.forms.appointment.patient_name = "Bob".into();
        state.forms.appointment.symptoms = "chest pain".into();
        state.forms.appointment.scheduled_time = "2024-01-15T10:30".into();

        let cmd = state.create_appointment().unwrap();
        // Editing the form while the request is in flight must not leak in
        state.forms.appointment.symptoms = "something else".into();

        state.handle_response(
            NetworkResponse::AppointmentCreated {
                id: pending_id(&cmd),
                appointment: AppointmentBooked {
                    doctor_name: "Dr. House".into(),
                    patient_name: "Bob".into(),
                    scheduled_time: "2024-01-15T10:30:00".into(),
                    status: AppointmentStatus::Scheduled,
                },
            },
            Instant::now(),
        );

        let expected = Appointment {
            id: 1,
            doctor_name: "Dr. House".into(),
            patient_name: "Bob".into(),
            scheduled_time: "2024-01-15T10:30:00".into(),
            status: AppointmentStatus::Scheduled,
            symptoms: Some("chest pain".into()),
        };
        assert_eq!(state.appointments, vec![expected]);
    }

    #[test]
    fn test_missing_patient_or_time_issues_no_request() {
        let mut state = AppState::new(BASE);
        state.forms.appointment.scheduled_time = "2024-01-15T10:30".into();
        assert!(state.create_appointment().is_none());
        assert_eq!(
            state.error_message(),
            Some("Please select a patient and schedule time")
        );
    }

    #[test]
    fn test_no_double_submit_while_loading() {
        let mut state = AppState::new(BASE);
        assert!(state.refresh_all().is_some());
        assert!(state.refresh_all().is_none());
        assert!(state.sync_to_database().is_none());

        state.forms.patient.name = "Bob".into();
        state.forms.patient.age = "30".into();
        assert!(state.create_patient().is_none());
    }

    #[test]
    fn test_sync_reports_counts_then_refreshes_quietly() {
        let mut state = AppState::new(BASE);
        let cmd = state.sync_to_database().unwrap();
        let now = Instant::now();

        let follow_up = state
            .handle_response(
                NetworkResponse::Synced {
                    id: pending_id(&cmd),
                    summary: SyncSummary {
                        message: Some("Sync completed".into()),
                        synced: SyncCounts { doctors: 2, patients: 3, appointments: 0 },
                    },
                },
                now,
            )
            .expect("sync must trigger a refresh");
        assert!(matches!(follow_up, NetworkCommand::FetchAll { .. }));
        assert!(state.is_loading);

        state.handle_response(
            NetworkResponse::Fetched {
                id: pending_id(&follow_up),
                snapshot: Snapshot::default(),
            },
            now,
        );
        assert_eq!(
            state.success_message(),
            Some("Sync completed: 2 doctors, 3 patients synced")
        );
    }

    #[test]
    fn test_sync_failure_message() {
        let mut state = AppState::new(BASE);
        let cmd = state.sync_to_database().unwrap();
        let follow_up = state.handle_response(
            NetworkResponse::Failed {
                id: pending_id(&cmd),
                error: ApiError::Status { status: 500, detail: Some("db locked".into()) },
            },
            Instant::now(),
        );
        assert!(follow_up.is_none());
        assert_eq!(state.error_message(), Some("Failed to sync with database"));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state = AppState::new(BASE);
        let first = state.refresh_all().unwrap();
        let cancel = state.cancel_request().unwrap();
        assert!(matches!(cancel, NetworkCommand::Cancel(id) if id == pending_id(&first)));

        state.handle_response(
            NetworkResponse::Cancelled { id: pending_id(&first) },
            Instant::now(),
        );
        assert!(!state.is_loading);
        assert_eq!(state.error_message(), Some("Request cancelled"));

        // The aborted request's payload arrives late
        state.handle_response(
            NetworkResponse::Fetched {
                id: pending_id(&first),
                snapshot: Snapshot {
                    doctors: vec![doctor(1, "Dr. Late")],
                    ..Snapshot::default()
                },
            },
            Instant::now(),
        );
        assert!(state.doctors.is_empty());
    }

    #[test]
    fn test_health_probe_does_not_block_operations() {
        let mut state = AppState::new(BASE);
        let probe = state.check_health().unwrap();
        assert!(state.check_health().is_none());
        assert!(!state.is_loading);
        assert!(state.refresh_all().is_some());

        state.handle_response(
            NetworkResponse::Health { id: pending_id(&probe), reachable: true },
            Instant::now(),
        );
        assert_eq!(state.backend_online, Some(true));
        assert!(state.is_loading);
    }

    #[test]
    fn test_new_operation_clears_error_banner() {
        let mut state = AppState::new(BASE);
        state.set_error("old failure");
        state.refresh_all().unwrap();
        assert!(state.banner.is_none());
    }

    #[test]
    fn test_typing_updates_search_live() {
        let mut state = AppState::new(BASE);
        state.appointments = vec![Appointment {
            id: 1,
            doctor_name: "Dr. Grey".into(),
            patient_name: "Alice".into(),
            scheduled_time: String::new(),
            status: AppointmentStatus::Pending,
            symptoms: None,
        }];
        state.start_editing();
        for c in "zz".chars() {
            state.enter_char(c);
        }
        assert_eq!(state.to_render_state().appointments.len(), 0);
        state.delete_char();
        state.delete_char();
        assert_eq!(state.to_render_state().appointments.len(), 1);
    }

    #[test]
    fn test_submit_dispatches_on_focused_form() {
        let mut state = AppState::new(BASE);
        state.switch_tab(AppTab::Create);
        state.patients = vec![patient(1, "Bob")];
        while !state.focused_field.is_picker() {
            state.next_field();
        }
        state.next_patient();
        state.next_field();
        state.next_field();
        state.start_editing();
        for c in "2024-01-15T10:30".chars() {
            state.enter_char(c);
        }

        let cmd = state.submit_form().unwrap();
        match cmd {
            NetworkCommand::CreateAppointment { input, .. } => {
                assert_eq!(input.patient_name, "Bob");
                assert_eq!(input.scheduled_time, "2024-01-15T10:30");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(state.input_mode, InputMode::Normal);
    }
}

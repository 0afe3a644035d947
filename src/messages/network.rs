//! Network messages - communication between App and Network layers

use crate::models::{
    AppointmentBooked, AppointmentCreate, DoctorCreate, DoctorEcho, PatientCreate, PatientEcho,
    Snapshot, SyncSummary,
};
use crate::network::ApiError;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch doctors, patients and appointments concurrently
    FetchAll { id: u64 },
    CreateDoctor { id: u64, input: DoctorCreate },
    CreatePatient { id: u64, input: PatientCreate },
    /// Book an appointment; the backend picks the doctor from the symptoms
    CreateAppointment { id: u64, input: AppointmentCreate },
    SyncToDatabase { id: u64 },
    /// Liveness probe (`GET /docs`)
    CheckHealth { id: u64 },
    /// Cancel a pending operation
    Cancel(u64),
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Fetched { id: u64, snapshot: Snapshot },
    DoctorCreated { id: u64, doctor: DoctorEcho },
    PatientCreated { id: u64, patient: PatientEcho },
    AppointmentCreated { id: u64, appointment: AppointmentBooked },
    Synced { id: u64, summary: SyncSummary },
    Health { id: u64, reachable: bool },
    /// The operation failed; the app layer decides the user-facing message
    Failed { id: u64, error: ApiError },
    /// Operation was cancelled
    Cancelled { id: u64 },
}

impl NetworkResponse {
    /// Get the operation ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Fetched { id, .. } => *id,
            NetworkResponse::DoctorCreated { id, .. } => *id,
            NetworkResponse::PatientCreated { id, .. } => *id,
            NetworkResponse::AppointmentCreated { id, .. } => *id,
            NetworkResponse::Synced { id, .. } => *id,
            NetworkResponse::Health { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
            NetworkResponse::Cancelled { id } => *id,
        }
    }
}

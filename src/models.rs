use serde::{Deserialize, Serialize};

/// A doctor as listed by `GET /doctors`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub specialty: String,
    pub contact: String,
}

/// A patient as listed by `GET /patients`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub symptoms: Option<String>,
}

/// Appointment status as reported by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Pending,
    Cancelled,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Other(s) => s,
        }
    }
}

/// A `null` status becomes `Other("")`
impl From<Option<String>> for AppointmentStatus {
    fn from(value: Option<String>) -> Self {
        let value = value.unwrap_or_default();
        match value.to_ascii_lowercase().as_str() {
            "scheduled" => AppointmentStatus::Scheduled,
            "completed" => AppointmentStatus::Completed,
            "pending" => AppointmentStatus::Pending,
            "cancelled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Other(value),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// An appointment. Doctor and patient are referenced by name only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor_name: String,
    pub patient_name: String,
    pub scheduled_time: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub symptoms: Option<String>,
}

impl Appointment {
    /// Case-insensitive substring match over patient, doctor and symptoms.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.patient_name.to_lowercase().contains(needle)
            || self.doctor_name.to_lowercase().contains(needle)
            || self
                .symptoms
                .as_deref()
                .map(|s| s.to_lowercase().contains(needle))
                .unwrap_or(false)
    }
}

// ========================
// Create payloads
// ========================

/// Body of `POST /doctors`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorCreate {
    pub name: String,
    pub age: i64,
    pub specialty: String,
    pub contact: String,
}

/// Body of `POST /patients`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientCreate {
    pub name: String,
    pub age: i64,
    pub symptoms: String,
}

/// Body of `POST /appointments/by-symptom`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub patient_name: String,
    pub symptoms: String,
    pub scheduled_time: String,
}

// ========================
// Create responses
// ========================

/// Doctor fields echoed back on creation (no id)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoctorEcho {
    pub name: String,
    pub age: i64,
    pub specialty: String,
    pub contact: String,
}

impl DoctorEcho {
    pub fn into_doctor(self, id: i64) -> Doctor {
        Doctor {
            id,
            name: self.name,
            age: self.age,
            specialty: self.specialty,
            contact: self.contact,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoctorCreated {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub doctor: DoctorEcho,
}

/// Patient fields echoed back on creation (no id)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientEcho {
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub symptoms: Option<String>,
}

impl PatientEcho {
    pub fn into_patient(self, id: i64) -> Patient {
        Patient {
            id,
            name: self.name,
            age: self.age,
            symptoms: self.symptoms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatientCreated {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub patient: PatientEcho,
}

/// Response of `POST /appointments/by-symptom`; the backend picks the doctor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppointmentBooked {
    pub doctor_name: String,
    pub patient_name: String,
    pub scheduled_time: String,
    pub status: AppointmentStatus,
}

impl AppointmentBooked {
    pub fn into_appointment(self, id: i64, symptoms: Option<String>) -> Appointment {
        Appointment {
            id,
            doctor_name: self.doctor_name,
            patient_name: self.patient_name,
            scheduled_time: self.scheduled_time,
            status: self.status,
            symptoms,
        }
    }
}

/// Counts reported by `POST /sync-system-to-db`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncCounts {
    #[serde(default)]
    pub doctors: u32,
    #[serde(default)]
    pub patients: u32,
    #[serde(default)]
    pub appointments: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSummary {
    #[serde(default)]
    pub message: Option<String>,
    pub synced: SyncCounts,
}

/// Full snapshot returned by a refresh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
}

/// Error body convention of the backend
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The `detail` field when it is a string
    pub fn detail_text(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

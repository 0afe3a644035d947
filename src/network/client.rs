//! HTTP client wrapper - typed calls against the Meditel backend

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::models::{
    Appointment, AppointmentBooked, AppointmentCreate, Doctor, DoctorCreate, DoctorCreated,
    DoctorEcho, ErrorBody, Patient, PatientCreate, PatientCreated, PatientEcho, Snapshot,
    SyncSummary,
};

/// Failure of a single API call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, reset...
    #[error("connection failed: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    /// Non-2xx answer, with the backend's `detail` when it sent one
    #[error("HTTP {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    /// 2xx answer whose body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default()
}

impl ApiError {
    /// The server-provided message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// True when the backend could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Turn a status code and raw body into the expected payload or an error
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail_text());
        return Err(ApiError::Status { status, detail });
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Typed client for the backend endpoints
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        ApiClient {
            client: create_client(config.request_timeout()),
            base_url: config.api_base.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        decode_body(status, &body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let resp = self.client.get(self.url(path)).send().await?;
        Self::read(resp).await
    }

    async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let mut req = self.client.post(self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Self::read(resp).await
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.get_json("/doctors").await
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get_json("/patients").await
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get_json("/appointments").await
    }

    /// Fetch the three collections concurrently; the first failure wins
    pub async fn fetch_all(&self) -> Result<Snapshot, ApiError> {
        let (doctors, patients, appointments) = tokio::try_join!(
            self.list_doctors(),
            self.list_patients(),
            self.list_appointments(),
        )?;
        Ok(Snapshot {
            doctors,
            patients,
            appointments,
        })
    }

    pub async fn create_doctor(&self, input: &DoctorCreate) -> Result<DoctorEcho, ApiError> {
        let created: DoctorCreated = self.post_json("/doctors", Some(input)).await?;
        Ok(created.doctor)
    }

    pub async fn create_patient(&self, input: &PatientCreate) -> Result<PatientEcho, ApiError> {
        let created: PatientCreated = self.post_json("/patients", Some(input)).await?;
        Ok(created.patient)
    }

    pub async fn create_appointment(
        &self,
        input: &AppointmentCreate,
    ) -> Result<AppointmentBooked, ApiError> {
        self.post_json("/appointments/by-symptom", Some(input)).await
    }

    pub async fn sync_to_database(&self) -> Result<SyncSummary, ApiError> {
        self.post_json::<(), _>("/sync-system-to-db", None).await
    }

    /// True when `GET /docs` answers with a 2xx
    pub async fn check_health(&self) -> bool {
        match self.client.get(self.url("/docs")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Health probe failed");
                false
            }
        }
    }
}

/// Create an HTTP client with the given per-request deadline
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

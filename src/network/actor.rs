//! Network actor - runs API calls in the Tokio async runtime

use std::collections::HashMap;
use std::future::Future;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::config::Config;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::ApiClient;

/// Tracks an in-flight operation for cancellation
struct ActiveRequest {
    cancel_tx: oneshot::Sender<()>,
}

/// Network actor that executes API commands
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<u64>,
    cancel_handles: HashMap<u64, ActiveRequest>,
}

impl NetworkActor {
    pub fn new(config: &Config, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client: ApiClient::new(config),
            response_tx,
            active_requests: JoinSet::new(),
            cancel_handles: HashMap::new(),
        }
    }

    /// Spawn `work` as operation `id`, racing it against a cancel signal
    fn spawn<F>(&mut self, id: u64, op: &'static str, work: F)
    where
        F: Future<Output = NetworkResponse> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.cancel_handles.insert(id, ActiveRequest { cancel_tx });
        let response_tx = self.response_tx.clone();

        self.active_requests.spawn(async move {
            tracing::info!(id, op, "Executing request");
            tokio::select! {
                biased;

                _ = cancel_rx => {
                    tracing::info!(id, op, "Request aborted");
                }
                response = work => {
                    match &response {
                        NetworkResponse::Failed { error, .. } => {
                            tracing::warn!(id, op, %error, "Request failed");
                        }
                        _ => tracing::info!(id, op, "Request completed"),
                    }
                    let _ = response_tx.send(response);
                }
            }
            id
        });
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchAll { id }) => {
                            let client = self.client.clone();
                            self.spawn(id, "fetch_all", async move {
                                match client.fetch_all().await {
                                    Ok(snapshot) => NetworkResponse::Fetched { id, snapshot },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::CreateDoctor { id, input }) => {
                            let client = self.client.clone();
                            self.spawn(id, "create_doctor", async move {
                                match client.create_doctor(&input).await {
                                    Ok(doctor) => NetworkResponse::DoctorCreated { id, doctor },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::CreatePatient { id, input }) => {
                            let client = self.client.clone();
                            self.spawn(id, "create_patient", async move {
                                match client.create_patient(&input).await {
                                    Ok(patient) => NetworkResponse::PatientCreated { id, patient },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::CreateAppointment { id, input }) => {
                            let client = self.client.clone();
                            self.spawn(id, "create_appointment", async move {
                                match client.create_appointment(&input).await {
                                    Ok(appointment) => NetworkResponse::AppointmentCreated { id, appointment },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::SyncToDatabase { id }) => {
                            let client = self.client.clone();
                            self.spawn(id, "sync_to_database", async move {
                                match client.sync_to_database().await {
                                    Ok(summary) => NetworkResponse::Synced { id, summary },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                }
                            });
                        }

                        Some(NetworkCommand::CheckHealth { id }) => {
                            let client = self.client.clone();
                            self.spawn(id, "check_health", async move {
                                let reachable = client.check_health().await;
                                NetworkResponse::Health { id, reachable }
                            });
                        }

                        Some(NetworkCommand::Cancel(id)) => {
                            if let Some(active) = self.cancel_handles.remove(&id) {
                                tracing::info!(id, "Cancelling request");
                                let _ = active.cancel_tx.send(());
                                let _ = self.response_tx.send(NetworkResponse::Cancelled { id });
                            }
                        }

                        Some(NetworkCommand::Shutdown) => {
                            for (_, active) in self.cancel_handles.drain() {
                                let _ = active.cancel_tx.send(());
                            }
                            break;
                        }

                        None => break,
                    }
                }

                Some(result) = self.active_requests.join_next() => {
                    if let Ok(id) = result {
                        self.cancel_handles.remove(&id);
                    }
                }
            }
        }
    }
}

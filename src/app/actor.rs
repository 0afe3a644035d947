//! App actor - message loop processing UI events and network responses

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// How often banner expiry is checked
const TICK: Duration = Duration::from_millis(100);

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    fn send(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Initial load and liveness probe
        let refresh = self.state.refresh_all();
        self.send(refresh);
        let probe = self.state.check_health();
        self.send(probe);
        self.render();

        let mut ticker = tokio::time::interval(TICK);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.render();
                }
                Some(response) = net_rx.recv() => {
                    let follow_up = self.state.handle_response(response, Instant::now());
                    self.send(follow_up);
                    self.render();
                }
                _ = ticker.tick() => {
                    if self.state.expire_banner(Instant::now()) {
                        self.render();
                    }
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Tab switching
            UiEvent::SwitchTab(tab) => self.state.switch_tab(tab),
            UiEvent::NextTab => self.state.next_tab(),
            UiEvent::PrevTab => self.state.prev_tab(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),

            // Create forms
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::NextPatient => self.state.next_patient(),
            UiEvent::PrevPatient => self.state.prev_patient(),
            UiEvent::Submit => {
                let cmd = self.state.submit_form();
                self.send(cmd);
            }

            // Backend operations
            UiEvent::Refresh => {
                let cmd = self.state.refresh_all();
                self.send(cmd);
            }
            UiEvent::SyncToDatabase => {
                let cmd = self.state.sync_to_database();
                self.send(cmd);
            }
            UiEvent::CheckHealth => {
                let cmd = self.state.check_health();
                self.send(cmd);
            }
            UiEvent::CancelRequest => {
                let cmd = self.state.cancel_request();
                self.send(cmd);
            }

            // Banner and popups
            UiEvent::DismissBanner => self.state.dismiss_banner(),
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

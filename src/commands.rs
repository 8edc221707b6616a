use tauri::{command, AppHandle, Emitter, Runtime, State};

use crate::controller::{CastController, HostNotifier};
use crate::models::{ServiceStatus, Toast};
use crate::systemd::SystemdUnit;

/// Event carrying a toast for the host UI to display.
pub const TOAST_EVENT: &str = "cast-toast";
/// Event carrying a freshly fetched status snapshot.
pub const STATUS_EVENT: &str = "cast-status";
/// Event the plugin listens on for out-of-band refresh requests.
pub const SERVICE_EVENT: &str = "cast-service-event";

/// Holds the controller for the casting service.
///
/// This struct is managed by Tauri and shared across command invocations.
pub struct CastState {
    /// The status-synchronized controller driving the casting service.
    pub controller: CastController<SystemdUnit>,
}

impl CastState {
    pub fn new(controller: CastController<SystemdUnit>) -> Self {
        Self { controller }
    }
}

impl<R: Runtime> HostNotifier for AppHandle<R> {
    fn toast(&self, toast: Toast) {
        if let Err(e) = self.emit(TOAST_EVENT, &toast) {
            log::error!("Failed to emit {} event: {}", TOAST_EVENT, e);
        }
    }

    fn status_changed(&self, status: &ServiceStatus) {
        if let Err(e) = self.emit(STATUS_EVENT, status) {
            log::error!("Failed to emit {} event: {}", STATUS_EVENT, e);
        }
    }
}

/// Starts the casting service.
///
/// The outcome is reported through a toast event and always followed by a
/// status refresh, so the returned snapshot reflects post-action server truth.
#[command]
pub async fn start_casting<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, CastState>,
) -> Result<Option<ServiceStatus>, String> {
    log::info!("`start_casting` command called");
    Ok(state.controller.start(&app).await)
}

/// Stops the casting service.
///
/// Mirrors `start_casting`: toast for the outcome, then an unconditional
/// status refresh.
#[command]
pub async fn stop_casting<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, CastState>,
) -> Result<Option<ServiceStatus>, String> {
    log::info!("`stop_casting` command called");
    Ok(state.controller.stop(&app).await)
}

/// Queries the service manager and returns the fresh status.
///
/// A failed query keeps the last known snapshot; failures never reach the
/// caller, they are surfaced as toast events.
#[command]
pub async fn refresh_status<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, CastState>,
) -> Result<Option<ServiceStatus>, String> {
    log::info!("`refresh_status` command called");
    Ok(state.controller.refresh_status(&app).await)
}

/// Returns the last fetched status without a remote round trip.
///
/// `None` means no refresh has succeeded yet.
#[command]
pub async fn get_status(state: State<'_, CastState>) -> Result<Option<ServiceStatus>, String> {
    Ok(state.controller.last_known().await)
}

//! A Tauri plugin for controlling a Chromecast receiver running as a systemd
//! user service.
//!
//! The plugin exposes start/stop/status commands to the host UI, keeps the
//! last fetched service status, and notifies the frontend through `cast-toast`
//! and `cast-status` events. At load it writes the playercast unit file,
//! reloads the user daemon, and fetches the initial status.

use tauri::{
    plugin::{Builder, TauriPlugin},
    AppHandle, EventId, Listener, Manager, Runtime,
};

mod commands;
mod controller;
mod error;
mod models;
mod provision;
mod systemd;

pub use commands::{SERVICE_EVENT, STATUS_EVENT, TOAST_EVENT};
pub use controller::{CastController, CastService, HostNotifier};
pub use error::Error;
pub use models::{Config, ServiceStatus, Toast};

use commands::CastState;
use systemd::SystemdUnit;

/// Handle for the passive service-event subscription registered at setup,
/// kept so teardown deregisters exactly the listener it registered.
struct ServiceEventSubscription(EventId);

/// Initializes the playercast plugin.
///
/// This function creates and configures the Tauri plugin, setting up the
/// controller state, provisioning the systemd unit, and registering the
/// invoke handlers for the frontend API.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("playercast")
        .invoke_handler(tauri::generate_handler![
            commands::start_casting,
            commands::stop_casting,
            commands::refresh_status,
            commands::get_status
        ])
        .setup(|app, api| {
            log::info!("playercast plugin initialized");
            let config = api.config().clone().unwrap_or_default();

            app.manage(CastState::new(CastController::new(SystemdUnit::new(
                config.service.clone(),
            ))));
            app.manage(subscribe_service_events(app));

            let app = app.clone();
            tauri::async_runtime::spawn(async move {
                if config.manage_unit {
                    provision_unit(&app, &config).await;
                }
                let state = app.state::<CastState>();
                let status = state.controller.refresh_status(&app).await;
                if config.autostart {
                    autostart(&app, status).await;
                }
            });
            Ok(())
        })
        .on_drop(|app| {
            if let Some(subscription) = app.try_state::<ServiceEventSubscription>() {
                app.unlisten(subscription.0);
            }
        })
        .build()
}

/// Registers the passive listener used for out-of-band refresh requests.
///
/// Anything in the host may fire the event; the plugin answers with a status
/// refresh.
fn subscribe_service_events<R: Runtime>(app: &AppHandle<R>) -> ServiceEventSubscription {
    let handle = app.clone();
    let id = app.listen(SERVICE_EVENT, move |_event| {
        let app = handle.clone();
        tauri::async_runtime::spawn(async move {
            let state = app.state::<CastState>();
            state.controller.refresh_status(&app).await;
        });
    });
    ServiceEventSubscription(id)
}

/// Writes the casting unit file and reloads the user daemon.
///
/// Failures are logged and swallowed; the plugin stays usable against a
/// previously installed unit.
async fn provision_unit<R: Runtime>(app: &AppHandle<R>, config: &Config) {
    let systemd_user_dir = match app.path().config_dir() {
        Ok(dir) => dir.join("systemd").join("user"),
        Err(e) => {
            log::error!("Failed to resolve systemd user directory: {}", e);
            return;
        }
    };

    match provision::install_unit(config, &systemd_user_dir).await {
        Ok(path) => {
            log::info!("Installed casting unit at {}", path.display());
            if let Err(e) = systemd::daemon_reload().await {
                log::warn!("systemd daemon-reload failed: {}", e);
            }
        }
        Err(e) => log::error!("Failed to install casting unit: {}", e),
    }
}

/// Starts the casting service at plugin load when it is not already running.
///
/// Mirrors the user pressing "Start casting", minus the toast: outcomes are
/// only logged.
async fn autostart<R: Runtime>(app: &AppHandle<R>, status: Option<ServiceStatus>) {
    if status.is_some_and(|s| s.running) {
        log::info!("Casting service already running");
        return;
    }

    let state = app.state::<CastState>();
    if state.controller.service().start().await {
        // Give the unit a moment to come up before re-reading its state.
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        state.controller.refresh_status(app).await;
    } else {
        log::error!("Failed to start casting service at plugin load");
    }
}

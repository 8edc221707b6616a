use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A snapshot of the casting service as reported by the service manager.
///
/// Replaced wholesale on every refresh; never partially mutated or synthesized
/// locally. `Option<ServiceStatus>` models the distinct "not yet loaded" value.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    /// Whether the casting service process is currently active.
    pub running: bool,
    /// Whether the service is configured to start automatically.
    pub enabled: bool,
    /// Name of the underlying service unit.
    pub service: String,
    /// Raw state label as reported by the service manager.
    pub state: String,
}

/// A transient notification for the host UI to display.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    /// The headline shown in the notification.
    pub title: String,
    /// The supporting message below the title.
    pub body: String,
}

impl Toast {
    fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    /// Shown when the casting service started successfully.
    pub fn cast_started() -> Self {
        Self::new(
            "Chromecast started",
            "The device is ready for casting content.",
        )
    }

    /// Shown when the start request came back unsuccessful.
    pub fn start_failed() -> Self {
        Self::new(
            "Failed to start",
            "Failed to start service for casting, try again later",
        )
    }

    /// Shown when the casting service stopped successfully.
    pub fn cast_stopped() -> Self {
        Self::new("Chromecast stopped", "Stopped casting service")
    }

    /// Shown when the stop request came back unsuccessful.
    pub fn stop_failed() -> Self {
        Self::new(
            "Failed to stop",
            "Failed to stop service for casting, try again later",
        )
    }

    /// Shown when the status query itself failed.
    pub fn status_failed() -> Self {
        Self::new(
            "Failed to get casting service status",
            "Showing the last known status instead",
        )
    }
}

/// Plugin configuration, read from the `playercast` entry of the Tauri
/// configuration file. Every field has a default, so an empty entry works.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Name of the systemd user unit hosting the casting service.
    #[serde(default = "default_service")]
    pub service: String,
    /// Receiver name advertised to casting senders.
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Media player the receiver hands streams to.
    #[serde(default = "default_player")]
    pub player: String,
    /// Path to the playercast binary.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// Whether to (re)write the unit file at plugin load.
    #[serde(default = "default_manage_unit")]
    pub manage_unit: bool,
    /// Whether to start the casting service at plugin load when it is not
    /// already running.
    #[serde(default)]
    pub autostart: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: default_service(),
            device_name: default_device_name(),
            player: default_player(),
            binary: default_binary(),
            manage_unit: default_manage_unit(),
            autostart: false,
        }
    }
}

fn default_service() -> String {
    "playercast.service".to_string()
}

fn default_device_name() -> String {
    "steam-deck".to_string()
}

fn default_player() -> String {
    "mpv".to_string()
}

fn default_binary() -> PathBuf {
    PathBuf::from("/usr/bin/playercast")
}

fn default_manage_unit() -> bool {
    true
}

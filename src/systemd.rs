//! systemctl-backed implementation of the remote casting service surface.
//!
//! Every invocation targets the user session (`systemctl --user`); the
//! casting service runs as a user unit alongside the host shell.

use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;

use crate::controller::CastService;
use crate::error::Error;
use crate::models::ServiceStatus;

/// The systemd user unit hosting the casting service.
pub struct SystemdUnit {
    unit: String,
}

impl SystemdUnit {
    pub fn new(unit: String) -> Self {
        Self { unit }
    }

    /// Runs a query subcommand and returns trimmed stdout.
    ///
    /// systemctl signals negative answers (`inactive`, `disabled`) through the
    /// exit code while still printing the answer, so the exit status is
    /// ignored here; only a spawn failure or unreadable output is an error.
    async fn query(&self, args: &[&str]) -> Result<String, Error> {
        let output = systemctl(args).await?;
        let stdout = std::str::from_utf8(&output.stdout)?;
        Ok(stdout.trim().to_string())
    }

    /// Runs a mutating subcommand, reporting success as a plain boolean.
    async fn run_action(&self, verb: &str) -> bool {
        match systemctl(&[verb, &self.unit]).await {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                log::error!("systemctl {} {} failed: {}", verb, self.unit, stderr.trim());
                false
            }
            Err(e) => {
                log::error!("Failed to run systemctl {} {}: {}", verb, self.unit, e);
                false
            }
        }
    }
}

#[async_trait]
impl CastService for SystemdUnit {
    async fn start(&self) -> bool {
        self.run_action("start").await
    }

    async fn stop(&self) -> bool {
        self.run_action("stop").await
    }

    async fn status(&self) -> Result<ServiceStatus, Error> {
        let active = self.query(&["is-active", &self.unit]).await?;
        let enabled = self.query(&["is-enabled", &self.unit]).await?;
        let state = self
            .query(&["show", &self.unit, "--property=ActiveState", "--value"])
            .await?;
        Ok(status_from_raw(&self.unit, &active, &enabled, &state))
    }
}

/// Reloads systemd user units so a freshly written unit file takes effect.
pub async fn daemon_reload() -> Result<(), Error> {
    let output = systemctl(&["daemon-reload"]).await?;
    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(Error::Systemd(format!(
            "daemon-reload failed: {}",
            stderr.trim()
        )))
    }
}

/// Executes a `systemctl --user` command and captures its output.
async fn systemctl(args: &[&str]) -> Result<Output, Error> {
    log::debug!("Running: systemctl --user {}", args.join(" "));
    let output = Command::new("systemctl")
        .arg("--user")
        .args(args)
        .output()
        .await?;
    Ok(output)
}

/// Maps raw systemctl answers onto a status snapshot.
fn status_from_raw(unit: &str, active: &str, enabled: &str, state: &str) -> ServiceStatus {
    ServiceStatus {
        running: active == "active",
        enabled: enabled == "enabled",
        service: unit.to_string(),
        state: if state.is_empty() {
            "unknown".to_string()
        } else {
            state.to_string()
        },
    }
}

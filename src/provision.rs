//! Installs the systemd user unit that hosts the casting service.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::models::Config;

/// Renders the unit file for the casting service.
pub fn unit_file(config: &Config) -> String {
    format!(
        r#"[Unit]
Description=Playercast Service
After=network-online.target
Wants=network-online.target

[Service]
Type=simple
Environment=DISPLAY=:0
ExecStart={binary} -q -n '{name}' --player '{player}'
Restart=always
RestartSec=10
StandardOutput=journal
StandardError=journal

[Install]
WantedBy=default.target
"#,
        binary = config.binary.display(),
        name = config.device_name,
        player = config.player,
    )
}

/// Writes the unit file into the systemd user directory and returns its path.
///
/// The content is deterministic, so rewriting it on every plugin load does not
/// conflict with an existing install.
pub async fn install_unit(config: &Config, systemd_user_dir: &Path) -> Result<PathBuf, Error> {
    tokio::fs::create_dir_all(systemd_user_dir).await?;
    let path = systemd_user_dir.join(&config.service);
    tokio::fs::write(&path, unit_file(config)).await?;
    Ok(path)
}

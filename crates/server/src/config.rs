use std::{
    fs,
    io::ErrorKind,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

/// Wake-on-LAN sidecar: tracks target power state and wakes targets on demand.
#[derive(Debug, Default, Parser)]
#[command(name = "wakeward", version)]
pub struct Cli {
    /// Targets file with one `id,mac,timeout` row per machine.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Port to listen on.
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Address to listen on.
    #[arg(short, long)]
    pub address: Option<IpAddr>,
    /// Destination for magic packets.
    #[arg(short, long)]
    pub broadcast: Option<SocketAddr>,
    /// Optional TOML settings file.
    #[arg(long, default_value = "sidecar.toml")]
    pub settings: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub targets_path: PathBuf,
    pub broadcast_addr: SocketAddr,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 10000,
            targets_path: PathBuf::from("sidecar.conf"),
            broadcast_addr: wol::DEFAULT_BROADCAST,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    bind_addr: Option<IpAddr>,
    port: Option<u16>,
    targets_path: Option<PathBuf>,
    broadcast_addr: Option<SocketAddr>,
}

impl Settings {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file.bind_addr {
            self.bind_addr = v;
        }
        if let Some(v) = file.port {
            self.port = v;
        }
        if let Some(v) = file.targets_path {
            self.targets_path = v;
        }
        if let Some(v) = file.broadcast_addr {
            self.broadcast_addr = v;
        }
        Ok(())
    }

    /// `APP__*` names win over the short `SIDECAR_*` names.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        let lookup = |short: &str, long: &str| var(long).or_else(|| var(short));

        if let Some(v) = lookup("SIDECAR_ADDRESS", "APP__BIND_ADDR") {
            self.bind_addr = v
                .parse()
                .with_context(|| format!("invalid listen address '{v}'"))?;
        }
        if let Some(v) = lookup("SIDECAR_PORT", "APP__PORT") {
            self.port = v.parse().with_context(|| format!("invalid port '{v}'"))?;
        }
        if let Some(v) = lookup("SIDECAR_CONFIG", "APP__TARGETS_PATH") {
            self.targets_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SIDECAR_BROADCAST", "APP__BROADCAST_ADDR") {
            self.broadcast_addr = v
                .parse()
                .with_context(|| format!("invalid broadcast address '{v}'"))?;
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = cli.address {
            self.bind_addr = v;
        }
        if let Some(v) = cli.port {
            self.port = v;
        }
        if let Some(v) = &cli.config {
            self.targets_path = v.clone();
        }
        if let Some(v) = cli.broadcast {
            self.broadcast_addr = v;
        }
    }
}

/// Defaults, then the settings file if present, then environment, then flags.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = read_optional(&cli.settings)? {
        settings
            .apply_file(&raw)
            .with_context(|| format!("invalid settings file '{}'", cli.settings.display()))?;
    }
    settings.apply_env(|name| std::env::var(name).ok())?;
    settings.apply_cli(cli);

    Ok(settings)
}

fn read_optional(path: &Path) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

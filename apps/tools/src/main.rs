use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use targets::Registry;
use wol::{parse_mac, UdpWakeSender, WakeSender};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a targets file and list what the sidecar would load.
    Check {
        #[arg(default_value = "sidecar.conf")]
        path: PathBuf,
    },
    /// Send a single magic packet.
    Wake {
        mac: String,
        #[arg(long, default_value_t = wol::DEFAULT_BROADCAST)]
        broadcast: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { path } => {
            let registry = Registry::from_path(&path)
                .with_context(|| format!("invalid targets file {}", path.display()))?;
            let mut bad_macs = 0;
            for target in registry.iter() {
                let mac_note = match parse_mac(target.mac()) {
                    Ok(_) => "",
                    Err(_) => {
                        bad_macs += 1;
                        "  (unparsable mac, wake will fail)"
                    }
                };
                println!(
                    "{}\t{}\t{}s{}",
                    target.id(),
                    target.mac(),
                    target.settle().as_secs(),
                    mac_note
                );
            }
            println!("{} target(s) loaded from {}", registry.len(), path.display());
            if bad_macs > 0 {
                anyhow::bail!("{bad_macs} target(s) have an unparsable mac address");
            }
        }
        Command::Wake { mac, broadcast } => {
            UdpWakeSender::new(broadcast).wake(&mac).await?;
            println!("magic packet for {mac} sent to {broadcast}");
        }
    }

    Ok(())
}

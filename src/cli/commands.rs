//! CLI entry point

use anyhow::Result;
use clap::Parser;

use crate::monitor::MonitorClient;

#[derive(Parser)]
#[command(name = "monitor")]
#[command(about = "Realtime WebSocket monitor for a clipboard synchronization server", long_about = None)]
struct Cli {
    /// WebSocket server address
    #[arg(long, default_value = "ws://localhost:3002/ws")]
    url: String,

    /// Device identifier sent to the server
    #[arg(long, default_value = "monitor-python")]
    device_id: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Create a multi-threaded runtime for the session
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut client = MonitorClient::new(&cli.url, &cli.device_id);

        // A failed handshake aborts the run before monitoring starts
        if let Err(e) = client.connect().await {
            println!("error: {e}");
            return Ok(());
        }

        client.start_monitoring().await;
        Ok(())
    })
}

//! Idobata CLI chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-client -- --name Alice
//! ```

use clap::Parser;

use idobata_client::{ClientConfig, run_client};
use idobata_shared::logger::setup_logger;

/// CLI chat client for Idobata.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value_t = 4000)]
    port: u16,

    /// Display name to join with
    #[arg(long)]
    name: String,

    /// Contact sent on the join form (not used by the relay)
    #[arg(long, default_value = "")]
    contact: String,
}

#[tokio::main]
async fn main() {
    // Keep the prompt clean; warnings still surface
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();
    let config = ClientConfig {
        host: args.host,
        port: args.port,
        name: args.name,
        contact: args.contact,
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

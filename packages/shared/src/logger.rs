//! Tracing subscriber setup shared by the server and client binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter is taken from `RUST_LOG` when set; otherwise the given binary
/// name (and the server library) default to `default_level`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let default_directive = format!(
        "{bin}={level},idobata_server={level},tower_http={level}",
        bin = bin_name.replace('-', "_"),
        level = default_level,
    );
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

//! Shared test fixtures.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::time::Duration;

use idobata_server::{ServerConfig, run};

/// A relay server running on a local port for the duration of a test.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Spawn the server on the given port and wait until it accepts
    /// connections.
    pub async fn start(port: u16) -> Self {
        // The task is detached; it ends with the test runtime.
        let _server = tokio::spawn(run(ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
        }));

        for _ in 0..100 {
            if tokio::net::TcpStream::connect(("127.0.0.1", port))
                .await
                .is_ok()
            {
                return Self { port };
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("server did not start listening on port {port}");
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }
}

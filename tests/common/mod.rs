//! Shared utilities for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use localchecker::{Config, HttpServer, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A site directory populated from `(relative path, contents)` pairs.
pub fn site(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, contents) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }
    dir
}

/// Config rooted at `root`, everything else default.
pub fn config_for(root: &Path) -> Config {
    Config {
        root: root.display().to_string(),
        ..Config::default()
    }
}

/// Start the server on an ephemeral local port.
pub async fn start_server(config: Config) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

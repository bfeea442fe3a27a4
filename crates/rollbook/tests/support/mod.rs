//! Shared helpers for integration tests.

#![allow(dead_code)]

use rollbook::server::{self, AllowedOrigins};
use rollbook::Storage;

/// Origin accepted by servers started through this module.
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Start a server over a fresh in-memory store on an ephemeral port.
///
/// Returns the service root, e.g. `http://127.0.0.1:41234`.
pub async fn start_server() -> String {
    let storage = Storage::open_in_memory().unwrap();
    let app = server::router(storage, AllowedOrigins::new([ALLOWED_ORIGIN]));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Collection URL under a service root.
pub fn students_url(base: &str) -> String {
    format!("{base}/students")
}

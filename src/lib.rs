//! A minimal JSON microservice and its documentation tooling.
//!
//! The HTTP side exposes a liveness check and an echo endpoint; the `pdf`
//! module converts markdown documentation to PDF. The binary in `main.rs`
//! wires both behind a small CLI.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod pdf;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use routes::create_router;
pub use state::AppState;

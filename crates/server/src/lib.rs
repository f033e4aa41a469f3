//! Senti Server - HTTP process for hotel review sentiment
//!
//! One axum process hosts both user-facing surfaces over a single loaded
//! model pair:
//!
//! - **Dashboard**: `GET /` serves the review-checker page; `POST /analyze`
//!   classifies with the binary policy and returns display-ready copy.
//! - **Prediction API**: `POST /predict` classifies with the tri-state policy
//!   and returns `{"sentiment", "confidence"}`.
//! - **Probes**: `GET /health` (liveness) and `GET /ready` (model readiness).
//!
//! Models load eagerly at startup; a failed load prevents the listener from
//! ever binding.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, start_server};
pub use state::AppState;

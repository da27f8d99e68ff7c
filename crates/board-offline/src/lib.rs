//! Offline cache filter for the board front end
//!
//! Intercepts outbound resource requests for a small web front end: a fixed
//! manifest of static assets is pre-cached once at install time, navigations
//! go network-first with a cache fallback, and every other request goes
//! cache-first with a network fallback. The host lifecycle (install, fetch,
//! termination) stays outside; all host effects enter through capability
//! parameters so the decision logic is testable with fixtures.

pub mod config;
pub mod error;
pub mod fetch;
pub mod types;
pub mod worker;

pub use config::WorkerConfig;
pub use error::{OfflineError, Result};
pub use fetch::{HttpFetcher, NetworkFetch};
pub use types::{Activation, InstallReport, Method, Request, RequestMode, Response, ServedFrom};
pub use worker::OfflineWorker;

//! Operator dashboard client for a multi-deck card shoe backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend owns every game; this crate keeps a local projection of one
//! selected game fresh by polling, merges the roster, hands and remaining
//! counts into a single snapshot, and routes operator mutations through an
//! action gateway that reports failures separately from sync health.
//!
//! - `net` talks HTTP and defines the wire schema.
//! - `state` holds the plain data the dashboard mutates.
//! - `dashboard` owns selection, the sync loop and the action gateway.
//! - `render` turns a view into text for the CLI.

pub mod config;
pub mod dashboard;
pub mod net;
pub mod render;
pub mod state;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{ActionOutcome, CycleOutcome, Dashboard, DashboardView};
pub use net::transport::{HttpTransport, Transport, TransportError};

//! Networking modules for the backend REST surface.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` performs single HTTP calls, `api` names the endpoints, and
//! `types` defines the wire schema.

pub mod api;
pub mod transport;
pub mod types;

//! Local dashboard state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `games` holds the session list, `session` the selected game's arena,
//! `projection` the merged server views, and `notice` the action errors.

pub mod games;
pub mod notice;
pub mod projection;
pub mod session;

//! # blindroute-types
//!
//! Shared types, errors, and configuration for the **BlindRoute** confidential
//! agent router.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AgentId`], [`TicketId`], [`Principal`], [`Handle`], [`EventId`]
//! - **Boundary events**: [`RouterEvent`], [`EventEnvelope`]
//! - **Configuration**: [`RouterConfig`]
//! - **Errors**: [`BlindRouteError`] with `BR_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `blindroute_types::constants::FOO`
// (not re-exported to avoid name collisions).

//! Core types for the eventual client.
//!
//! This crate provides the shared types used by eventual-client and
//! eventual-cli:
//! - `Event` and related domain types
//! - `Session` / `User` for authentication state
//! - `FilterCriteria` for the client-side filter pass
//! - `validate` for event form validation
//! - log-viewer wire types

pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod logs;
pub mod session;
pub mod user;
pub mod validate;

pub use error::{EventualError, EventualResult};
pub use event::{Categoria, Event, EventForm};
pub use filter::FilterCriteria;
pub use session::{Session, SessionPhase};
pub use user::User;

//! Client plumbing for the eventual backend.
//!
//! - `storage`: the persisted session pair (token + user)
//! - `session`: the session store, sole owner of auth state
//! - `api`: the HTTP gateway (bearer injection, 401 handling, envelopes)
//! - `directory`: the event search/filter pipeline
//! - `callback`: the OAuth loopback callback flow

pub mod api;
pub mod callback;
pub mod directory;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use directory::{EventDirectory, Notice};
pub use session::SessionStore;
pub use storage::SessionStorage;

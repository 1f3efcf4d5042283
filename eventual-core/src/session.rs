//! Session state snapshot.
//!
//! The session is owned exclusively by the `SessionStore` in eventual-client;
//! everything else reads cloned snapshots of this type.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Authentication lifecycle phase.
///
/// `Anonymous → Authenticating → Authenticated → Anonymous` (on logout or
/// token invalidation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Read-only view of the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub phase: SessionPhase,
    pub token: Option<String>,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Session::anonymous()
    }
}

impl Session {
    pub fn anonymous() -> Self {
        Session {
            phase: SessionPhase::Anonymous,
            token: None,
            user: None,
            error: None,
        }
    }

    /// Anonymous with a user-visible error (e.g. after a failed verification).
    pub fn failed(error: impl Into<String>) -> Self {
        Session {
            error: Some(error.into()),
            ..Session::anonymous()
        }
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Session {
            phase: SessionPhase::Authenticated,
            token: Some(token.into()),
            user: Some(user),
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Authenticating
    }
}

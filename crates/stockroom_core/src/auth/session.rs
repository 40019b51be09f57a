//! Caller-held authenticated session.
//!
//! A `Session` is issued by a successful login and owned by the presentation
//! layer. Dropping it is logging out. Gated inventory operations take it by
//! reference instead of reading process-wide login flags.

use crate::model::user::Role;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Identity and role of one authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    session_id: Uuid,
    username: String,
    role: Role,
    /// Unix epoch milliseconds.
    issued_at_ms: i64,
}

impl Session {
    pub(crate) fn issue(username: impl Into<String>, role: Role) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            username: username.into(),
            role,
            issued_at_ms: now_epoch_ms(),
        }
    }

    /// Rebuilds a session from its stored parts. Callers must only restore
    /// sessions they issued themselves.
    pub fn restore(session_id: Uuid, username: String, role: Role, issued_at_ms: i64) -> Self {
        Self {
            session_id,
            username,
            role,
            issued_at_ms,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn issued_at_ms(&self) -> i64 {
        self.issued_at_ms
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

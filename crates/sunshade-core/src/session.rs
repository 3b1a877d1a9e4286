//! Access to the signed-in staff member.
//!
//! The session provider itself is external; the form controller only needs the
//! display name that ends up as the report's sender.

/// Read-only view of the current session.
pub trait SessionReader: Send + Sync {
    /// Display name of the signed-in user.
    fn current_user_name(&self) -> String;
}

/// Session with a fixed user name (CLI, tests).
#[derive(Debug, Clone)]
pub struct StaticSession {
    user_name: String,
}

impl StaticSession {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
        }
    }
}

impl SessionReader for StaticSession {
    fn current_user_name(&self) -> String {
        self.user_name.clone()
    }
}

// ============================================================================
// Registry Core - Registration Entity
// File: crates/registry-core/src/domain/registration.rs
// Description: Link between a student and the teacher they are registered under
// ============================================================================

use chrono::{DateTime, Utc};

/// A student registered under a teacher.
///
/// The link stays in place when the student is suspended; `suspended_at`
/// only removes it from active rosters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: i64,
    pub student_email: String,
    pub teacher_email: String,
    pub created_at: DateTime<Utc>,
    pub suspended_at: Option<DateTime<Utc>>,
}

impl Registration {
    pub fn is_active(&self) -> bool {
        self.suspended_at.is_none()
    }

    /// Marks the link suspended. The first suspension time is kept.
    pub fn suspend(&mut self, at: DateTime<Utc>) {
        if self.suspended_at.is_none() {
            self.suspended_at = Some(at);
        }
    }

    /// Puts a suspended link back on active rosters.
    pub fn reactivate(&mut self) {
        self.suspended_at = None;
    }
}

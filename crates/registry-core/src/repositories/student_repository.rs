//! Student repository trait (port)

use async_trait::async_trait;
use crate::domain::Student;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError>;

    /// Distinct subset of `emails` belonging to students with at least one
    /// registration. Suspended registrations only count when
    /// `include_suspended` is set.
    async fn find_emails_in(
        &self,
        emails: &[String],
        include_suspended: bool,
    ) -> Result<Vec<String>, DomainError>;
}

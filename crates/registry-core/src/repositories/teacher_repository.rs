//! Teacher repository trait (port)

use async_trait::async_trait;
use crate::domain::Teacher;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Teacher>, DomainError>;

    /// Number of distinct teachers among `emails`.
    async fn count_existing(&self, emails: &[String]) -> Result<u64, DomainError>;
}

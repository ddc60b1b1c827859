//! Registration repository trait (port)

use async_trait::async_trait;
use registry_shared::CommonStudentsMode;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Distinct student emails with an active registration under the given
    /// teachers, ordered by email. `mode` decides whether a student needs
    /// one of the teachers or all of them.
    async fn find_registered_student_emails(
        &self,
        teacher_emails: &[String],
        mode: CommonStudentsMode,
    ) -> Result<Vec<String>, DomainError>;
}

// ============================================================================
// Registry Infrastructure - PostgreSQL Registration Repository
// File: crates/registry-infrastructure/src/database/postgres/registration_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::PgPool;

use registry_core::error::DomainError;
use registry_core::repositories::RegistrationRepository;
use registry_shared::CommonStudentsMode;

use super::queries;

pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    async fn find_registered_student_emails(
        &self,
        teacher_emails: &[String],
        mode: CommonStudentsMode,
    ) -> Result<Vec<String>, DomainError> {
        if teacher_emails.is_empty() {
            return Ok(Vec::new());
        }
        queries::active_student_emails(&self.pool, teacher_emails, mode).await
    }
}

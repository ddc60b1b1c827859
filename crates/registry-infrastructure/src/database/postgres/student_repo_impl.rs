// ============================================================================
// Registry Infrastructure - PostgreSQL Student Repository
// File: crates/registry-infrastructure/src/database/postgres/student_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::PgPool;

use registry_core::domain::Student;
use registry_core::error::DomainError;
use registry_core::repositories::StudentRepository;

use super::queries;

pub struct PgStudentRepository {
    pool: PgPool,
}

impl PgStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError> {
        queries::find_student(&self.pool, email).await
    }

    async fn find_emails_in(
        &self,
        emails: &[String],
        include_suspended: bool,
    ) -> Result<Vec<String>, DomainError> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        queries::registered_student_emails_in(&self.pool, emails, include_suspended).await
    }
}

// ============================================================================
// Registry Infrastructure - PostgreSQL Teacher Repository
// File: crates/registry-infrastructure/src/database/postgres/teacher_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::PgPool;

use registry_core::domain::Teacher;
use registry_core::error::DomainError;
use registry_core::repositories::TeacherRepository;

use super::queries;

pub struct PgTeacherRepository {
    pool: PgPool,
}

impl PgTeacherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeacherRepository for PgTeacherRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Teacher>, DomainError> {
        queries::find_teacher(&self.pool, email).await
    }

    async fn count_existing(&self, emails: &[String]) -> Result<u64, DomainError> {
        if emails.is_empty() {
            return Ok(0);
        }
        queries::count_teachers(&self.pool, emails).await
    }
}

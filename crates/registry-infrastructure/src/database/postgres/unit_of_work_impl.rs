// ============================================================================
// Registry Infrastructure - PostgreSQL Unit of Work
// File: crates/registry-infrastructure/src/database/postgres/unit_of_work_impl.rs
// ============================================================================
//! Transaction-scoped access for write paths.
//!
//! The wrapped `sqlx::Transaction` rolls back when dropped, which covers
//! early returns and cancelled requests.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use registry_core::domain::{Student, Teacher};
use registry_core::error::DomainError;
use registry_core::repositories::{TransactionManager, UnitOfWork};

use super::queries::{self, db_error};

pub struct PgTransactionManager {
    pool: PgPool,
}

impl PgTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("beginning transaction", e))?;
        debug!("Transaction started");
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_teacher_by_email(&mut self, email: &str) -> Result<Option<Teacher>, DomainError> {
        queries::find_teacher(&mut *self.tx, email).await
    }

    async fn find_student_by_email(&mut self, email: &str) -> Result<Option<Student>, DomainError> {
        queries::find_student(&mut *self.tx, email).await
    }

    async fn find_existing_student_emails(
        &mut self,
        emails: &[String],
    ) -> Result<Vec<String>, DomainError> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        queries::existing_student_emails(&mut *self.tx, emails).await
    }

    async fn create_student(&mut self, student: &Student) -> Result<(), DomainError> {
        queries::insert_student(&mut *self.tx, student).await
    }

    async fn create_teacher(&mut self, teacher: &Teacher) -> Result<(), DomainError> {
        queries::insert_teacher(&mut *self.tx, teacher).await
    }

    async fn create_registrations(
        &mut self,
        teacher_email: &str,
        student_emails: &[String],
    ) -> Result<u64, DomainError> {
        if student_emails.is_empty() {
            return Ok(0);
        }
        queries::insert_registrations(&mut *self.tx, teacher_email, student_emails).await
    }

    async fn suspend_registrations(&mut self, student_email: &str) -> Result<u64, DomainError> {
        queries::suspend_registrations(&mut *self.tx, student_email).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("committing transaction", e))?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| db_error("rolling back transaction", e))?;
        debug!("Transaction rolled back");
        Ok(())
    }
}

// ============================================================================
// Registry Core - Unit of Work
// File: crates/registry-core/src/repositories/unit_of_work.rs
// ============================================================================
//! Transactional port used by every mutating operation.
//!
//! A `UnitOfWork` owns one open transaction. Dropping it without calling
//! `commit` discards every write made through it.

use async_trait::async_trait;
use crate::domain::{Student, Teacher};
use crate::error::DomainError;

#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_teacher_by_email(&mut self, email: &str) -> Result<Option<Teacher>, DomainError>;

    async fn find_student_by_email(&mut self, email: &str) -> Result<Option<Student>, DomainError>;

    /// Distinct subset of `emails` that exist as students.
    async fn find_existing_student_emails(
        &mut self,
        emails: &[String],
    ) -> Result<Vec<String>, DomainError>;

    async fn create_student(&mut self, student: &Student) -> Result<(), DomainError>;

    async fn create_teacher(&mut self, teacher: &Teacher) -> Result<(), DomainError>;

    /// Inserts one registration per student under `teacher_email` in a single
    /// statement. Returns the number of new rows.
    async fn create_registrations(
        &mut self,
        teacher_email: &str,
        student_emails: &[String],
    ) -> Result<u64, DomainError>;

    /// Sets `suspended_at` on the student's registrations that are not yet
    /// suspended. Returns the number of rows touched.
    async fn suspend_registrations(&mut self, student_email: &str) -> Result<u64, DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}

#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError>;
}

// ============================================================================
// Registry Infrastructure - Shared SQL
// File: crates/registry-infrastructure/src/database/postgres/queries.rs
// ============================================================================
//! Statements shared by the pool-backed repositories and the transactional
//! unit of work. Every function is generic over the executor so the same SQL
//! runs on `&PgPool` or on an open transaction.

use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, Postgres};
use std::collections::HashSet;
use tracing::error;

use registry_core::domain::{Student, Teacher};
use registry_core::error::DomainError;
use registry_shared::CommonStudentsMode;

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
pub(super) struct StudentRow {
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            email: row.email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct TeacherRow {
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<TeacherRow> for Teacher {
    fn from(row: TeacherRow) -> Self {
        Teacher {
            email: row.email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Maps a driver error. Unique and foreign-key violations become
/// `Constraint`, everything else `Store`.
pub(super) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            DomainError::Constraint(db.message().to_string())
        }
        _ => DomainError::Store(e.to_string()),
    }
}

pub(super) async fn find_student<'e, E>(executor: E, email: &str) -> Result<Option<Student>, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: Option<StudentRow> = sqlx::query_as(
        r#"
        SELECT email, name, created_at, updated_at, deleted_at
        FROM student
        WHERE email = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
    .map_err(|e| db_error("finding student by email", e))?;

    Ok(row.map(|r| r.into()))
}

pub(super) async fn find_teacher<'e, E>(executor: E, email: &str) -> Result<Option<Teacher>, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: Option<TeacherRow> = sqlx::query_as(
        r#"
        SELECT email, name, created_at, updated_at, deleted_at
        FROM teacher
        WHERE email = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
    .map_err(|e| db_error("finding teacher by email", e))?;

    Ok(row.map(|r| r.into()))
}

/// `include_suspended = true` has no caller in the service; it mirrors the
/// port's contract.
pub(super) async fn registered_student_emails_in<'e, E>(
    executor: E,
    emails: &[String],
    include_suspended: bool,
) -> Result<Vec<String>, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT s.email
        FROM student s
        JOIN register r ON r.student_email = s.email
        WHERE s.email = ANY($1)
          AND s.deleted_at IS NULL
          AND ($2 OR r.suspended_at IS NULL)
        ORDER BY s.email
        "#,
    )
    .bind(emails)
    .bind(include_suspended)
    .fetch_all(executor)
    .await
    .map_err(|e| db_error("finding registered students", e))
}

pub(super) async fn existing_student_emails<'e, E>(
    executor: E,
    emails: &[String],
) -> Result<Vec<String>, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT email
        FROM student
        WHERE email = ANY($1) AND deleted_at IS NULL
        ORDER BY email
        "#,
    )
    .bind(emails)
    .fetch_all(executor)
    .await
    .map_err(|e| db_error("finding existing students", e))
}

pub(super) async fn count_teachers<'e, E>(executor: E, emails: &[String]) -> Result<u64, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    let count: i64 = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(DISTINCT email)
        FROM teacher
        WHERE email = ANY($1) AND deleted_at IS NULL
        "#,
    )
    .bind(emails)
    .fetch_one(executor)
    .await
    .map_err(|e| db_error("counting teachers", e))?;

    Ok(count.max(0) as u64)
}

/// Union or intersection of active rosters. `InMemoryStore` in
/// `registry-core` implements the same rules and is what the service tests
/// run against.
pub(super) async fn active_student_emails<'e, E>(
    executor: E,
    teacher_emails: &[String],
    mode: CommonStudentsMode,
) -> Result<Vec<String>, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    // NULL disables the HAVING filter, giving the union of rosters.
    let required_teachers: Option<i64> = match mode {
        CommonStudentsMode::Union => None,
        CommonStudentsMode::Intersection => {
            Some(teacher_emails.iter().collect::<HashSet<_>>().len() as i64)
        }
    };

    sqlx::query_scalar::<_, String>(
        r#"
        SELECT student_email
        FROM register
        WHERE suspended_at IS NULL AND teacher_email = ANY($1)
        GROUP BY student_email
        HAVING $2::BIGINT IS NULL OR COUNT(DISTINCT teacher_email) = $2::BIGINT
        ORDER BY student_email
        "#,
    )
    .bind(teacher_emails)
    .bind(required_teachers)
    .fetch_all(executor)
    .await
    .map_err(|e| db_error("finding registered student emails", e))
}

pub(super) async fn insert_student<'e, E>(executor: E, student: &Student) -> Result<(), DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO student (email, name, created_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&student.email)
    .bind(&student.name)
    .bind(student.created_at)
    .execute(executor)
    .await
    .map_err(|e| db_error("creating student", e))?;

    Ok(())
}

pub(super) async fn insert_teacher<'e, E>(executor: E, teacher: &Teacher) -> Result<(), DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO teacher (email, name, created_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&teacher.email)
    .bind(&teacher.name)
    .bind(teacher.created_at)
    .execute(executor)
    .await
    .map_err(|e| db_error("creating teacher", e))?;

    Ok(())
}

/// One statement for the whole batch, so the insert is atomic on its own.
/// A suspended pair is reactivated; an active pair is left untouched and not
/// counted.
pub(super) async fn insert_registrations<'e, E>(
    executor: E,
    teacher_email: &str,
    student_emails: &[String],
) -> Result<u64, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO register (student_email, teacher_email)
        SELECT student_email, $2
        FROM UNNEST($1::TEXT[]) AS batch(student_email)
        ON CONFLICT (student_email, teacher_email)
        DO UPDATE SET suspended_at = NULL
        WHERE register.suspended_at IS NOT NULL
        "#,
    )
    .bind(student_emails)
    .bind(teacher_email)
    .execute(executor)
    .await
    .map_err(|e| db_error("creating registrations", e))?;

    Ok(result.rows_affected())
}

pub(super) async fn suspend_registrations<'e, E>(executor: E, student_email: &str) -> Result<u64, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE register
        SET suspended_at = NOW()
        WHERE student_email = $1 AND suspended_at IS NULL
        "#,
    )
    .bind(student_email)
    .execute(executor)
    .await
    .map_err(|e| db_error("suspending registrations", e))?;

    Ok(result.rows_affected())
}

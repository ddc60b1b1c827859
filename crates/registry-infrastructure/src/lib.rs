//! # Registry Infrastructure
//! 
//! PostgreSQL implementations of the registry ports (adapters).

pub mod database;

pub use database::{
    create_pool, run_migrations, PgRegistrationRepository, PgStudentRepository,
    PgTeacherRepository, PgTransactionManager,
};

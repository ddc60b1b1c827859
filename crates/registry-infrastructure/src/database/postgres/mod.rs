//! PostgreSQL repository implementations

mod queries;
pub mod student_repo_impl;
pub mod teacher_repo_impl;
pub mod registration_repo_impl;
pub mod unit_of_work_impl;

pub use student_repo_impl::PgStudentRepository;
pub use teacher_repo_impl::PgTeacherRepository;
pub use registration_repo_impl::PgRegistrationRepository;
pub use unit_of_work_impl::PgTransactionManager;

//! Repository traits (ports)

pub mod student_repository;
pub mod teacher_repository;
pub mod registration_repository;
pub mod unit_of_work;

pub use student_repository::StudentRepository;
pub use teacher_repository::TeacherRepository;
pub use registration_repository::RegistrationRepository;
pub use unit_of_work::{TransactionManager, UnitOfWork};

#[cfg(test)]
pub use student_repository::MockStudentRepository;
#[cfg(test)]
pub use teacher_repository::MockTeacherRepository;
#[cfg(test)]
pub use registration_repository::MockRegistrationRepository;

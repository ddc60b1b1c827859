//! # Registry Core - Domain Module
//! 
//! Domain entities for the student registry.

pub mod student;
pub mod teacher;
pub mod registration;

pub use student::Student;
pub use teacher::Teacher;
pub use registration::Registration;

//! # Registry Core
//! 
//! Domain entities, services, and repository traits for the student registry.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;

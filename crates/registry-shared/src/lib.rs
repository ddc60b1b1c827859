//! # Registry Shared
//! 
//! Configuration, telemetry, and small utilities shared by the registry crates.

pub mod constants;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::{AppConfig, CommonStudentsMode};
pub use error::AppError;

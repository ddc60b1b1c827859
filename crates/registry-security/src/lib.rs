//! # Registry Security
//! 
//! Signed access tokens for the registry API.

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};

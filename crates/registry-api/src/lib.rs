//! # Registry API
//! 
//! HTTP handlers, middleware, error mapping, and the router.

pub mod handlers;
pub mod middleware;
pub mod error;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;

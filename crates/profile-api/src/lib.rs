//! # Profile API
//! 
//! HTTP handlers, middleware, DTOs and router for the member profile service.

pub mod handlers;
pub mod middleware;
pub mod dto;
pub mod error;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;

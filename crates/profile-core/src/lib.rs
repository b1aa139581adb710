//! # Profile Core
//! 
//! Domain entities, services, repository and gateway traits for the member profile service.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod gateways;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;

//! Request identity and error translation middleware

pub mod error_details;
pub mod identity;

pub use error_details::{expose_error_details, handle_panic};
pub use identity::AuthenticatedMember;

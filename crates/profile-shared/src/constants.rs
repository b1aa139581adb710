//! Application-wide constants

/// Header carrying the member id authenticated by the upstream gateway
pub const MEMBER_ID_HEADER: &str = "x-member-id";

pub const ENV_DEVELOPMENT: &str = "development";

/// Upload body limit for photo assets (10MB)
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

pub const GENERIC_ERROR_MESSAGE: &str = "Internal Server Error";

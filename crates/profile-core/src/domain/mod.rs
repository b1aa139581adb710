//! # Profile Core - Domain Module
//! 
//! Domain entities for the member profile service.

pub mod account;
pub mod member;
pub mod photo;
pub mod main_image;
pub mod aggregate;

// Re-export all entities
pub use account::Account;
pub use member::{Member, MemberView, ProfilePatch};
pub use photo::{Photo, AssetUpload, UploadedAsset};
pub use main_image::MainImage;
pub use aggregate::{MemberAggregate, MemberChangeset};

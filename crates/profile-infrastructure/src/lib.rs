//! # Profile Infrastructure
//! 
//! Database, in-memory and asset host implementations (adapters), plus the fixture seeder.

pub mod database;
pub mod memory;
pub mod assets;
pub mod seed;

pub use database::{create_pool, run_migrations, PgMemberRepository};
pub use memory::InMemoryMemberRepository;
pub use assets::{build_asset_host, CloudinaryAssetHost, LocalAssetHost};
pub use seed::{seed_members, SeedError};

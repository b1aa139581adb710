//! In-memory adapters, used when no database is configured and in tests

pub mod member_repo_impl;

pub use member_repo_impl::InMemoryMemberRepository;

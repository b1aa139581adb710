//! Repository traits (ports)

pub mod member_repository;

pub use member_repository::MemberRepository;
#[cfg(test)]
pub use member_repository::MockMemberRepository;

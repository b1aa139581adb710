//! Domain services (business logic)

pub mod profile_service;
pub mod gallery_service;

pub use profile_service::ProfileService;
pub use gallery_service::GalleryService;

use crate::domain::MemberAggregate;
use crate::error::DomainError;
use crate::repositories::MemberRepository;

/// Commit the aggregate's pending changes, a commit that writes nothing is a failure
pub(crate) async fn commit_aggregate(
    repo: &dyn MemberRepository,
    aggregate: &MemberAggregate,
    failure: &str,
) -> Result<(), DomainError> {
    let changes = aggregate.changeset();
    if repo.commit(&changes).await? {
        Ok(())
    } else {
        Err(DomainError::PersistenceError(failure.to_string()))
    }
}

use crate::errors::TargetsRepositoryError;
use votes_shared::types::{Target, TargetKind, TargetRef};

/// Trait for reading the post and comment read-models.
///
/// Posts and comments are owned by their own services; this is a read-only view
/// of their existence, author and creation time.
#[async_trait::async_trait]
pub trait TargetsRepository: Send + Sync {
    async fn get_target(&self, target: TargetRef) -> Result<Option<Target>, TargetsRepositoryError>;
    async fn list_targets(&self, kind: TargetKind) -> Result<Vec<Target>, TargetsRepositoryError>;
}

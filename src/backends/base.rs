//! Backend interface for reading and retiring actual LRPs.

use async_trait::async_trait;

use crate::models::{ActualLrpGroup, ActualLrpGroupsByIndex, ActualLrpKey};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The store has no record for the requested key.
    #[error("the requested resource could not be found")]
    ResourceNotFound,
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound)
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Store capability consumed by the actual LRP handlers.
///
/// Every call is a single round trip; callers never fan out per item.
#[async_trait]
pub trait ActualLrpBackend: Send + Sync {
    /// All groups, in store order. `domain` restricts the listing to groups
    /// whose visible record belongs to that domain.
    async fn actual_lrp_groups(&self, domain: Option<&str>) -> BackendResult<Vec<ActualLrpGroup>>;

    /// Groups for one process guid. An unknown guid yields an empty map.
    async fn actual_lrp_groups_by_process_guid(
        &self,
        process_guid: &str,
    ) -> BackendResult<ActualLrpGroupsByIndex>;

    /// The group at one slot, or [`BackendError::ResourceNotFound`].
    async fn actual_lrp_group_by_process_guid_and_index(
        &self,
        process_guid: &str,
        index: u32,
    ) -> BackendResult<ActualLrpGroup>;

    /// Request that the instances at the given keys stop.
    async fn retire_actual_lrps(&self, keys: &[ActualLrpKey]) -> BackendResult<()>;
}

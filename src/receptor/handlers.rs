//! Actual LRP request handling, independent of the HTTP framework.

use std::sync::Arc;

use tracing::{debug, error, warn};

use super::error::ReceptorError;
use super::params::RequestParams;
use super::serialization::{ActualLrpResponse, actual_lrp_group_to_response, actual_lrp_to_response};
use crate::backends::{ActualLrpBackend, BackendError};
use crate::models::ActualLrpGroup;

#[derive(Clone)]
pub struct ActualLrpHandler {
    backend: Arc<dyn ActualLrpBackend>,
}

impl ActualLrpHandler {
    pub fn new(backend: Arc<dyn ActualLrpBackend>) -> Self {
        Self { backend }
    }

    /// Every visible actual LRP, optionally restricted to one domain.
    pub async fn get_all(
        &self,
        domain: Option<&str>,
    ) -> Result<Vec<ActualLrpResponse>, ReceptorError> {
        debug!(?domain, "get-all");
        let groups = self
            .backend
            .actual_lrp_groups(domain)
            .await
            .map_err(|err| {
                // Listing has no not-found outcome; every store failure is unknown.
                error!(?err, "failed to fetch actual lrp groups");
                ReceptorError::Unknown(err.to_string())
            })?;

        Ok(groups
            .iter()
            .filter_map(visible_response)
            .filter(|response| domain.is_none_or(|domain| response.domain == domain))
            .collect())
    }

    pub async fn get_all_by_process_guid(
        &self,
        params: &RequestParams,
    ) -> Result<Vec<ActualLrpResponse>, ReceptorError> {
        let process_guid = params.process_guid().inspect_err(|err| {
            debug!(%err, "get-all-by-process-guid rejected");
        })?;
        debug!(process_guid, "get-all-by-process-guid");

        let groups = match self
            .backend
            .actual_lrp_groups_by_process_guid(process_guid)
            .await
        {
            Ok(groups) => groups,
            Err(err) if err.is_not_found() => {
                debug!(process_guid, "no actual lrps for process guid");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(store_failure(
                    err,
                    "failed to fetch actual lrp groups by process guid",
                ));
            }
        };

        Ok(groups.values().filter_map(visible_response).collect())
    }

    pub async fn get_by_process_guid_and_index(
        &self,
        params: &RequestParams,
    ) -> Result<ActualLrpResponse, ReceptorError> {
        let (process_guid, index) = params.slot().inspect_err(|err| {
            debug!(%err, "get-by-process-guid-and-index rejected");
        })?;
        debug!(process_guid, index, "get-by-process-guid-and-index");

        let group = self.fetch_group(process_guid, index).await?;
        let (lrp, evacuating) = group.resolve().ok_or(ReceptorError::ResourceNotFound)?;
        Ok(actual_lrp_to_response(&lrp, evacuating))
    }

    /// Retire the visible instance at one slot.
    ///
    /// When the slot is evacuating only the evacuating record's key is
    /// retired; the primary underneath is left alone.
    pub async fn kill_by_process_guid_and_index(
        &self,
        params: &RequestParams,
    ) -> Result<(), ReceptorError> {
        let (process_guid, index) = params.slot().inspect_err(|err| {
            debug!(%err, "kill-by-process-guid-and-index rejected");
        })?;
        debug!(process_guid, index, "kill-by-process-guid-and-index");

        let group = self.fetch_group(process_guid, index).await?;
        let (lrp, evacuating) = group.resolve().ok_or(ReceptorError::ResourceNotFound)?;

        self.backend
            .retire_actual_lrps(std::slice::from_ref(&lrp.key))
            .await
            .map_err(|err| store_failure(err, "failed to retire actual lrp"))?;
        debug!(process_guid, index, evacuating, "retired actual lrp");
        Ok(())
    }

    async fn fetch_group(
        &self,
        process_guid: &str,
        index: u32,
    ) -> Result<ActualLrpGroup, ReceptorError> {
        self.backend
            .actual_lrp_group_by_process_guid_and_index(process_guid, index)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    debug!(process_guid, index, "actual lrp not found");
                    ReceptorError::ResourceNotFound
                } else {
                    error!(?err, process_guid, index, "failed to fetch actual lrp group");
                    ReceptorError::from(err)
                }
            })
    }
}

fn store_failure(err: BackendError, context: &'static str) -> ReceptorError {
    error!(?err, "{context}");
    ReceptorError::from(err)
}

fn visible_response(group: &ActualLrpGroup) -> Option<ActualLrpResponse> {
    let response = actual_lrp_group_to_response(group);
    if response.is_none() {
        warn!("skipping actual lrp group with no instance");
    }
    response
}

//! Backend wrapper that records calls and injects failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::base::{ActualLrpBackend, BackendError, BackendResult};
use super::memory::MemoryBackend;
use crate::models::{ActualLrpGroup, ActualLrpGroupsByIndex, ActualLrpKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    ActualLrpGroups,
    ActualLrpGroupsByProcessGuid,
    ActualLrpGroupByProcessGuidAndIndex,
    RetireActualLrps,
}

#[derive(Clone, Debug)]
enum Fault {
    NotFound,
    Message(String),
}

impl Fault {
    fn to_error(&self) -> BackendError {
        match self {
            Self::NotFound => BackendError::ResourceNotFound,
            Self::Message(msg) => BackendError::message(msg.clone()),
        }
    }
}

/// Arguments seen by the backend, one entry per call.
#[derive(Clone, Debug, Default)]
pub struct BackendCalls {
    pub actual_lrp_groups: Vec<Option<String>>,
    pub actual_lrp_groups_by_process_guid: Vec<String>,
    pub actual_lrp_group_by_process_guid_and_index: Vec<(String, u32)>,
    pub retire_actual_lrps: Vec<Vec<ActualLrpKey>>,
}

impl BackendCalls {
    pub fn total(&self) -> usize {
        self.actual_lrp_groups.len()
            + self.actual_lrp_groups_by_process_guid.len()
            + self.actual_lrp_group_by_process_guid_and_index.len()
            + self.retire_actual_lrps.len()
    }
}

#[derive(Clone)]
pub struct FaultInjectingBackend {
    inner: MemoryBackend,
    faults: Arc<Mutex<HashMap<Operation, Fault>>>,
    calls: Arc<Mutex<BackendCalls>>,
}

impl FaultInjectingBackend {
    pub fn new(inner: MemoryBackend) -> Self {
        Self {
            inner,
            faults: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(BackendCalls::default())),
        }
    }

    pub fn inner(&self) -> &MemoryBackend {
        &self.inner
    }

    /// Fail every subsequent call to `operation` with `message`.
    pub fn fail_with(&self, operation: Operation, message: impl Into<String>) {
        self.faults
            .lock()
            .expect("faults poisoned")
            .insert(operation, Fault::Message(message.into()));
    }

    /// Report not-found for every subsequent call to `operation`.
    pub fn fail_not_found(&self, operation: Operation) {
        self.faults
            .lock()
            .expect("faults poisoned")
            .insert(operation, Fault::NotFound);
    }

    pub fn calls(&self) -> BackendCalls {
        self.calls.lock().expect("calls poisoned").clone()
    }

    fn check(&self, operation: Operation) -> BackendResult<()> {
        match self.faults.lock().expect("faults poisoned").get(&operation) {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ActualLrpBackend for FaultInjectingBackend {
    async fn actual_lrp_groups(&self, domain: Option<&str>) -> BackendResult<Vec<ActualLrpGroup>> {
        self.calls
            .lock()
            .expect("calls poisoned")
            .actual_lrp_groups
            .push(domain.map(str::to_string));
        self.check(Operation::ActualLrpGroups)?;
        self.inner.actual_lrp_groups(domain).await
    }

    async fn actual_lrp_groups_by_process_guid(
        &self,
        process_guid: &str,
    ) -> BackendResult<ActualLrpGroupsByIndex> {
        self.calls
            .lock()
            .expect("calls poisoned")
            .actual_lrp_groups_by_process_guid
            .push(process_guid.to_string());
        self.check(Operation::ActualLrpGroupsByProcessGuid)?;
        self.inner
            .actual_lrp_groups_by_process_guid(process_guid)
            .await
    }

    async fn actual_lrp_group_by_process_guid_and_index(
        &self,
        process_guid: &str,
        index: u32,
    ) -> BackendResult<ActualLrpGroup> {
        self.calls
            .lock()
            .expect("calls poisoned")
            .actual_lrp_group_by_process_guid_and_index
            .push((process_guid.to_string(), index));
        self.check(Operation::ActualLrpGroupByProcessGuidAndIndex)?;
        self.inner
            .actual_lrp_group_by_process_guid_and_index(process_guid, index)
            .await
    }

    async fn retire_actual_lrps(&self, keys: &[ActualLrpKey]) -> BackendResult<()> {
        self.calls
            .lock()
            .expect("calls poisoned")
            .retire_actual_lrps
            .push(keys.to_vec());
        self.check(Operation::RetireActualLrps)?;
        self.inner.retire_actual_lrps(keys).await
    }
}

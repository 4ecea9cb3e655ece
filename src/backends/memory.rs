//! In-memory backend for local runs and tests.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use super::base::{ActualLrpBackend, BackendError, BackendResult};
use crate::models::{ActualLrp, ActualLrpGroup, ActualLrpGroupsByIndex, ActualLrpKey};

type SlotKey = (String, u32);
type GroupStore = BTreeMap<SlotKey, ActualLrpGroup>;

/// Backend that keeps actual LRP groups in memory, ordered by process guid
/// and index.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    groups: Arc<Mutex<GroupStore>>,
    retired: Arc<Mutex<Vec<ActualLrpKey>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(groups: impl IntoIterator<Item = ActualLrpGroup>) -> Self {
        let backend = Self::new();
        backend.insert_groups(groups);
        backend
    }

    /// Load a JSON list of groups, as written by [`MemoryBackend::to_json`].
    pub fn from_seed_file(path: &Path) -> BackendResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            BackendError::message(format!("failed to read seed file {}: {err}", path.display()))
        })?;
        let groups: Vec<ActualLrpGroup> = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), groups = groups.len(), "seeding memory backend");
        Ok(Self::with_groups(groups))
    }

    pub fn to_json(&self) -> BackendResult<String> {
        let guard = self.groups.lock().expect("groups poisoned");
        let groups: Vec<&ActualLrpGroup> = guard.values().collect();
        Ok(serde_json::to_string_pretty(&groups)?)
    }

    /// Insert whole groups, keyed by their visible record. Empty groups are
    /// dropped.
    pub fn insert_groups(&self, groups: impl IntoIterator<Item = ActualLrpGroup>) {
        let mut guard = self.groups.lock().expect("groups poisoned");
        for group in groups {
            let Some((lrp, _)) = group.resolved() else {
                continue;
            };
            let slot = slot_key(&lrp.key);
            guard.insert(slot, group);
        }
    }

    /// Insert or replace the primary record for a slot.
    pub fn upsert_actual_lrp(&self, lrp: ActualLrp) {
        let mut guard = self.groups.lock().expect("groups poisoned");
        let slot = slot_key(&lrp.key);
        guard.entry(slot).or_default().instance = Some(lrp);
    }

    /// Insert or replace the evacuating record for a slot.
    pub fn upsert_evacuating_actual_lrp(&self, lrp: ActualLrp) {
        let mut guard = self.groups.lock().expect("groups poisoned");
        let slot = slot_key(&lrp.key);
        guard.entry(slot).or_default().evacuating = Some(lrp);
    }

    pub fn remove_evacuating_actual_lrp(&self, key: &ActualLrpKey) {
        let mut guard = self.groups.lock().expect("groups poisoned");
        let slot = slot_key(key);
        if let Some(group) = guard.get_mut(&slot) {
            group.evacuating = None;
            if group.is_empty() {
                guard.remove(&slot);
            }
        }
    }

    /// Keys passed to `retire_actual_lrps`, in call order.
    pub fn retired_keys(&self) -> Vec<ActualLrpKey> {
        self.retired.lock().expect("retired poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.groups.lock().expect("groups poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn slot_key(key: &ActualLrpKey) -> SlotKey {
    (key.process_guid.clone(), key.index)
}

#[async_trait]
impl ActualLrpBackend for MemoryBackend {
    async fn actual_lrp_groups(&self, domain: Option<&str>) -> BackendResult<Vec<ActualLrpGroup>> {
        let guard = self.groups.lock().expect("groups poisoned");
        let groups = guard
            .values()
            .filter(|group| match (domain, group.resolved()) {
                (None, _) => true,
                (Some(domain), Some((lrp, _))) => lrp.key.domain == domain,
                (Some(_), None) => false,
            })
            .cloned()
            .collect();
        Ok(groups)
    }

    async fn actual_lrp_groups_by_process_guid(
        &self,
        process_guid: &str,
    ) -> BackendResult<ActualLrpGroupsByIndex> {
        let guard = self.groups.lock().expect("groups poisoned");
        let groups = guard
            .iter()
            .filter(|((guid, _), _)| guid == process_guid)
            .map(|((_, index), group)| (*index, group.clone()))
            .collect();
        Ok(groups)
    }

    async fn actual_lrp_group_by_process_guid_and_index(
        &self,
        process_guid: &str,
        index: u32,
    ) -> BackendResult<ActualLrpGroup> {
        let guard = self.groups.lock().expect("groups poisoned");
        match guard.get(&(process_guid.to_string(), index)) {
            Some(group) if !group.is_empty() => Ok(group.clone()),
            _ => Err(BackendError::ResourceNotFound),
        }
    }

    async fn retire_actual_lrps(&self, keys: &[ActualLrpKey]) -> BackendResult<()> {
        let mut guard = self.groups.lock().expect("groups poisoned");
        for key in keys {
            let slot = slot_key(key);
            // The evacuating copy is torn down by the draining cell, not here.
            if let Some(group) = guard.get_mut(&slot) {
                if group
                    .instance
                    .as_ref()
                    .is_some_and(|instance| instance.key == *key)
                {
                    group.instance = None;
                }
                if group.is_empty() {
                    guard.remove(&slot);
                }
            }
        }
        self.retired
            .lock()
            .expect("retired poisoned")
            .extend(keys.iter().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActualLrpInstanceKey, ActualLrpState};

    fn lrp(process_guid: &str, index: u32, domain: &str, state: ActualLrpState) -> ActualLrp {
        ActualLrp::new(
            ActualLrpKey::new(process_guid, index, domain),
            ActualLrpInstanceKey::new(format!("{process_guid}-{index}"), "cell-0"),
            state,
            1138,
        )
    }

    #[tokio::test]
    async fn test_lists_groups_in_key_order_with_domain_filter() {
        let backend = MemoryBackend::new();
        backend.upsert_actual_lrp(lrp("process-guid-1", 0, "domain-1", ActualLrpState::Running));
        backend.upsert_actual_lrp(lrp("process-guid-0", 1, "domain-0", ActualLrpState::Claimed));

        let all = backend.actual_lrp_groups(None).await.unwrap();
        let guids: Vec<_> = all
            .iter()
            .map(|group| group.instance.as_ref().unwrap().key.process_guid.as_str())
            .collect();
        assert_eq!(guids, vec!["process-guid-0", "process-guid-1"]);

        let filtered = backend.actual_lrp_groups(Some("domain-1")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(
            filtered[0].instance.as_ref().unwrap().key.domain,
            "domain-1"
        );
    }

    #[tokio::test]
    async fn test_domain_filter_uses_evacuating_record() {
        let backend = MemoryBackend::new();
        backend.upsert_actual_lrp(lrp(
            "process-guid-0",
            0,
            "domain-old",
            ActualLrpState::Unclaimed,
        ));
        backend.upsert_evacuating_actual_lrp(lrp(
            "process-guid-0",
            0,
            "domain-new",
            ActualLrpState::Running,
        ));

        assert!(backend.actual_lrp_groups(Some("domain-old")).await.unwrap().is_empty());
        assert_eq!(backend.actual_lrp_groups(Some("domain-new")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upserts_share_one_slot() {
        let backend = MemoryBackend::new();
        let primary = lrp("process-guid-0", 3, "domain-0", ActualLrpState::Claimed);
        let shadow = lrp("process-guid-0", 3, "domain-0", ActualLrpState::Running);
        backend.upsert_actual_lrp(primary.clone());
        backend.upsert_evacuating_actual_lrp(shadow.clone());
        backend.upsert_actual_lrp(primary.clone());

        assert_eq!(backend.len(), 1);
        let group = backend
            .actual_lrp_group_by_process_guid_and_index("process-guid-0", 3)
            .await
            .unwrap();
        assert_eq!(group.instance, Some(primary));
        assert_eq!(group.evacuating, Some(shadow));
    }

    #[tokio::test]
    async fn test_missing_slot_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .actual_lrp_group_by_process_guid_and_index("missing", 0)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let by_guid = backend
            .actual_lrp_groups_by_process_guid("missing")
            .await
            .unwrap();
        assert!(by_guid.is_empty());
    }

    #[tokio::test]
    async fn test_retire_removes_primary_but_keeps_evacuating() {
        let backend = MemoryBackend::new();
        let primary = lrp("process-guid-0", 0, "domain-0", ActualLrpState::Claimed);
        let shadow = lrp("process-guid-0", 0, "domain-0", ActualLrpState::Running);
        backend.upsert_actual_lrp(primary.clone());
        backend.upsert_evacuating_actual_lrp(shadow.clone());

        backend
            .retire_actual_lrps(std::slice::from_ref(&primary.key))
            .await
            .unwrap();

        let group = backend
            .actual_lrp_group_by_process_guid_and_index("process-guid-0", 0)
            .await
            .unwrap();
        assert_eq!(group.instance, None);
        assert_eq!(group.evacuating, Some(shadow));
        assert_eq!(backend.retired_keys(), vec![primary.key.clone()]);

        backend.remove_evacuating_actual_lrp(&primary.key);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_seed_file_round_trip() {
        let backend = MemoryBackend::with_groups([ActualLrpGroup::with_instance(lrp(
            "process-guid-0",
            4,
            "domain-0",
            ActualLrpState::Crashed,
        ))]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, backend.to_json().unwrap()).unwrap();

        let loaded = MemoryBackend::from_seed_file(&path).unwrap();
        let group = loaded
            .actual_lrp_group_by_process_guid_and_index("process-guid-0", 4)
            .await
            .unwrap();
        assert_eq!(group.instance.unwrap().state, ActualLrpState::Crashed);
    }

    #[test]
    fn test_seed_file_missing_reports_path() {
        let err = MemoryBackend::from_seed_file(Path::new("/nonexistent/seed.json"))
            .err()
            .expect("missing file fails");
        assert!(err.to_string().contains("/nonexistent/seed.json"));
    }
}

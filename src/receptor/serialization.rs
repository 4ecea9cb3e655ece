//! Projection of actual LRP records onto the public response shape.

use serde::{Deserialize, Serialize};

use crate::models::{ActualLrp, ActualLrpGroup, ActualLrpState, PortMapping};

/// Externally visible view of one actual LRP.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualLrpResponse {
    pub process_guid: String,
    pub instance_guid: String,
    pub cell_id: String,
    pub domain: String,
    pub index: u32,
    pub address: String,
    pub ports: Vec<PortMapping>,
    pub state: ActualLrpState,
    pub since: i64,
    pub evacuating: bool,
}

pub fn actual_lrp_to_response(lrp: &ActualLrp, evacuating: bool) -> ActualLrpResponse {
    ActualLrpResponse {
        process_guid: lrp.key.process_guid.clone(),
        instance_guid: lrp.instance_key.instance_guid.clone(),
        cell_id: lrp.instance_key.cell_id.clone(),
        domain: lrp.key.domain.clone(),
        index: lrp.key.index,
        address: lrp.net_info.address.clone(),
        ports: lrp.net_info.ports.clone(),
        state: lrp.state,
        since: lrp.since,
        evacuating,
    }
}

/// Response for the group's visible record, if it has one.
pub fn actual_lrp_group_to_response(group: &ActualLrpGroup) -> Option<ActualLrpResponse> {
    group
        .resolved()
        .map(|(lrp, evacuating)| actual_lrp_to_response(lrp, evacuating))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActualLrpInstanceKey, ActualLrpKey, ActualLrpNetInfo};

    #[test]
    fn test_running_lrp_with_ports() {
        let lrp = ActualLrp::new(
            ActualLrpKey::new("process-guid-0", 1, "domain-0"),
            ActualLrpInstanceKey::new("instance-guid-0", "cell-id-0"),
            ActualLrpState::Running,
            1138,
        )
        .with_net_info(ActualLrpNetInfo::new(
            "10.0.0.4",
            vec![PortMapping {
                container_port: 8080,
                host_port: 61001,
            }],
        ));

        let json = serde_json::to_value(actual_lrp_to_response(&lrp, false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "process_guid": "process-guid-0",
                "instance_guid": "instance-guid-0",
                "cell_id": "cell-id-0",
                "domain": "domain-0",
                "index": 1,
                "address": "10.0.0.4",
                "ports": [{"container_port": 8080, "host_port": 61001}],
                "state": "RUNNING",
                "since": 1138,
                "evacuating": false
            })
        );
    }

    #[test]
    fn test_unclaimed_lrp_has_empty_placement() {
        let lrp = ActualLrp::new(
            ActualLrpKey::new("process-guid-2", 0, "domain-0"),
            ActualLrpInstanceKey::default(),
            ActualLrpState::Unclaimed,
            7,
        );
        let response = actual_lrp_to_response(&lrp, false);
        assert_eq!(response.instance_guid, "");
        assert_eq!(response.cell_id, "");
        assert!(response.ports.is_empty());
    }

    #[test]
    fn test_group_response_prefers_evacuating() {
        let primary = ActualLrp::new(
            ActualLrpKey::new("process-guid-1", 2, "domain-1"),
            ActualLrpInstanceKey::new("instance-guid-1", "cell-id-1"),
            ActualLrpState::Claimed,
            4444,
        );
        let mut evacuating = primary.clone();
        evacuating.state = ActualLrpState::Running;
        evacuating.since = 3417;

        let group = ActualLrpGroup::with_evacuating(Some(primary), evacuating.clone());
        assert_eq!(
            actual_lrp_group_to_response(&group),
            Some(actual_lrp_to_response(&evacuating, true))
        );
        assert_eq!(actual_lrp_group_to_response(&ActualLrpGroup::default()), None);
    }
}

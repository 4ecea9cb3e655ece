//! Actual LRP records as read from the backend store.
//!
//! An actual LRP is one concrete occupant of a process slot. The store hands
//! us an [`ActualLrpGroup`] per slot: the primary instance plus, while a cell is
//! being evacuated, the evacuating copy that is still serving traffic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a logical slot within a process.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActualLrpKey {
    pub process_guid: String,
    pub index: u32,
    pub domain: String,
}

impl ActualLrpKey {
    pub fn new(process_guid: impl Into<String>, index: u32, domain: impl Into<String>) -> Self {
        Self {
            process_guid: process_guid.into(),
            index,
            domain: domain.into(),
        }
    }
}

/// Identifies where an instance lives. Empty strings mean unplaced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActualLrpInstanceKey {
    #[serde(default)]
    pub instance_guid: String,
    #[serde(default)]
    pub cell_id: String,
}

impl ActualLrpInstanceKey {
    pub fn new(instance_guid: impl Into<String>, cell_id: impl Into<String>) -> Self {
        Self {
            instance_guid: instance_guid.into(),
            cell_id: cell_id.into(),
        }
    }

    pub fn is_placed(&self) -> bool {
        !self.instance_guid.is_empty() && !self.cell_id.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
}

/// Routable address of a running instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualLrpNetInfo {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub ports: Vec<PortMapping>,
}

impl ActualLrpNetInfo {
    pub fn new(address: impl Into<String>, ports: Vec<PortMapping>) -> Self {
        Self {
            address: address.into(),
            ports,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActualLrpState {
    Unclaimed,
    Claimed,
    Running,
    Crashed,
}

impl fmt::Display for ActualLrpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclaimed => write!(f, "UNCLAIMED"),
            Self::Claimed => write!(f, "CLAIMED"),
            Self::Running => write!(f, "RUNNING"),
            Self::Crashed => write!(f, "CRASHED"),
        }
    }
}

/// One occupant of a slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualLrp {
    #[serde(flatten)]
    pub key: ActualLrpKey,
    #[serde(flatten)]
    pub instance_key: ActualLrpInstanceKey,
    #[serde(default)]
    pub net_info: ActualLrpNetInfo,
    pub state: ActualLrpState,
    /// Time of the last state change, in nanoseconds since the epoch.
    pub since: i64,
}

impl ActualLrp {
    pub fn new(
        key: ActualLrpKey,
        instance_key: ActualLrpInstanceKey,
        state: ActualLrpState,
        since: i64,
    ) -> Self {
        Self {
            key,
            instance_key,
            net_info: ActualLrpNetInfo::default(),
            state,
            since,
        }
    }

    pub fn with_net_info(mut self, net_info: ActualLrpNetInfo) -> Self {
        self.net_info = net_info;
        self
    }
}

/// Primary and evacuating records for a single slot, as stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualLrpGroup {
    #[serde(default)]
    pub instance: Option<ActualLrp>,
    #[serde(default)]
    pub evacuating: Option<ActualLrp>,
}

/// Slot index to group, for a single process guid.
pub type ActualLrpGroupsByIndex = BTreeMap<u32, ActualLrpGroup>;

impl ActualLrpGroup {
    pub fn with_instance(instance: ActualLrp) -> Self {
        Self {
            instance: Some(instance),
            evacuating: None,
        }
    }

    pub fn with_evacuating(instance: Option<ActualLrp>, evacuating: ActualLrp) -> Self {
        Self {
            instance,
            evacuating: Some(evacuating),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instance.is_none() && self.evacuating.is_none()
    }

    pub fn occupant(self) -> Occupant {
        match (self.instance, self.evacuating) {
            (None, None) => Occupant::Empty,
            (Some(primary), None) => Occupant::Primary(primary),
            (None, Some(shadow)) => Occupant::Shadow(shadow),
            (Some(primary), Some(shadow)) => Occupant::Both { primary, shadow },
        }
    }

    /// Borrowing form of [`Occupant::resolve`].
    pub fn resolved(&self) -> Option<(&ActualLrp, bool)> {
        match (&self.instance, &self.evacuating) {
            (_, Some(shadow)) => Some((shadow, true)),
            (Some(primary), None) => Some((primary, false)),
            (None, None) => None,
        }
    }

    pub fn resolve(self) -> Option<(ActualLrp, bool)> {
        self.occupant().resolve()
    }
}

/// What currently occupies a slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Occupant {
    Empty,
    Primary(ActualLrp),
    Shadow(ActualLrp),
    Both { primary: ActualLrp, shadow: ActualLrp },
}

impl Occupant {
    /// Picks the record to expose and whether it is the evacuating one.
    ///
    /// The evacuating record wins whenever present; the primary is only
    /// visible once evacuation has finished.
    pub fn resolve(self) -> Option<(ActualLrp, bool)> {
        match self {
            Self::Empty => None,
            Self::Primary(primary) => Some((primary, false)),
            Self::Shadow(shadow) | Self::Both { shadow, .. } => Some((shadow, true)),
        }
    }
}

//! Receptor - public API handlers for querying and retiring actual LRPs.

pub mod backends;
pub mod config;
pub mod models;
pub mod observability;
pub mod receptor;

pub use backends::{ActualLrpBackend, BackendError, BackendResult, MemoryBackend};
pub use config::Config;
pub use models::{
    ActualLrp, ActualLrpGroup, ActualLrpGroupsByIndex, ActualLrpInstanceKey, ActualLrpKey,
    ActualLrpNetInfo, ActualLrpState, Occupant, PortMapping,
};
pub use receptor::{ActualLrpHandler, ActualLrpResponse, ReceptorConfig, ReceptorServer};

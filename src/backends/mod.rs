//! Backend implementations for actual LRP state.

mod base;
mod fault_injection;
mod memory;

pub use base::{ActualLrpBackend, BackendError, BackendResult};
pub use fault_injection::{BackendCalls, FaultInjectingBackend, Operation};
pub use memory::MemoryBackend;

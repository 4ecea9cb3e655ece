//! Public HTTP API for actual LRPs.
//!
//! Routes:
//! - `GET /v1/actual_lrps[?domain=X]`
//! - `GET /v1/actual_lrps/{process_guid}`
//! - `GET /v1/actual_lrps/{process_guid}/index/{index}`
//! - `DELETE /v1/actual_lrps/{process_guid}/index/{index}`

mod error;
mod handlers;
mod params;
mod serialization;
mod server;
mod types;

pub use error::{ErrorKind, ErrorResponse, ReceptorError};
pub use handlers::ActualLrpHandler;
pub use params::{INDEX_PARAM, PROCESS_GUID_PARAM, ParamError, RequestParams};
pub use serialization::{ActualLrpResponse, actual_lrp_group_to_response, actual_lrp_to_response};
pub use server::{ReceptorServer, build_router};
pub use types::*;

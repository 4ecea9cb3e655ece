//! Path and query parameter extraction.
//!
//! Missing or malformed parameters are routine, so extraction returns a
//! [`ParamError`] rather than failing the request outright; handlers turn it
//! into a 400 before touching the backend.

use std::collections::HashMap;

pub const PROCESS_GUID_PARAM: &str = "process_guid";
pub const INDEX_PARAM: &str = "index";

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("process_guid missing from request")]
    MissingProcessGuid,
    #[error("index missing from request")]
    MissingIndex,
    #[error("index not a number")]
    IndexNotANumber,
}

/// Named parameters captured from a request route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestParams(HashMap<String, String>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Value of `name`, treating an empty value as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn process_guid(&self) -> Result<&str, ParamError> {
        self.get(PROCESS_GUID_PARAM)
            .ok_or(ParamError::MissingProcessGuid)
    }

    /// Instance index as stored. Values wider than `u32` are not a number.
    pub fn index(&self) -> Result<u32, ParamError> {
        let raw = self.get(INDEX_PARAM).ok_or(ParamError::MissingIndex)?;
        raw.parse().map_err(|_| ParamError::IndexNotANumber)
    }

    /// Both slot parameters, process guid checked first.
    pub fn slot(&self) -> Result<(&str, u32), ParamError> {
        let process_guid = self.process_guid()?;
        let index = self.index()?;
        Ok((process_guid, index))
    }
}

impl From<HashMap<String, String>> for RequestParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self(params)
    }
}

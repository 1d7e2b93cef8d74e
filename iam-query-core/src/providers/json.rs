//! Native JSON provider backed by `serde_json`.
//!
//! Parsing errors are reported as [`QueryError::DatasetUnavailable`] with the
//! origin of the document and the line/column of the failure, so a malformed
//! service reference file can be located without a debugger.

use serde::{Deserialize, Serialize};

use crate::errors::{QueryError, Result};

/// Stateless JSON provider; `Send + Sync`.
#[derive(Debug, Clone)]
pub struct NativeJsonProvider;

impl NativeJsonProvider {
    /// Parse JSON text into a typed value.
    ///
    /// `origin` names where the text came from (a file path or embedded asset)
    /// and is echoed in the error message.
    pub fn parse<T>(json_str: &str, origin: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_json::from_str(json_str).map_err(|e| QueryError::dataset_parse(origin, &e))
    }

    /// Parse JSON bytes into a typed value.
    pub fn parse_slice<T>(bytes: &[u8], origin: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_json::from_slice(bytes).map_err(|e| QueryError::dataset_parse(origin, &e))
    }

    /// Serialize a value to indented JSON text.
    pub fn stringify_pretty<T>(value: &T) -> serde_json::Result<String>
    where
        T: ?Sized + Serialize,
    {
        serde_json::to_string_pretty(value)
    }
}

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// What the backend reports about a remote file.
///
/// Attribute translation into filesystem stat structures happens above
/// this layer; the reconciliation core only ever looks at the size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Properties {
    pub size: u64,
    pub last_modified: Option<SystemTime>,
    pub etag: Option<String>,
}

impl Properties {
    pub fn with_size(size: u64) -> Self {
        Self {
            size,
            last_modified: None,
            etag: None,
        }
    }
}

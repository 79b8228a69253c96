use serde::{Deserialize, Serialize};
use sharefs_common::{MAX_FILE_SIZE, MAX_RANGE_COUNT, MAX_RANGE_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The most bytes a single range upload may carry.
    ///
    /// Small files are always uploaded with this range size no matter
    /// how short their actual content is.
    pub max_range_size: u64,
    /// The largest file the share can represent.
    pub max_file_size: u64,
    /// How many ranges one file may be decomposed into at most.
    pub max_range_count: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_range_size: MAX_RANGE_SIZE,   // 4MiB
            max_file_size: MAX_FILE_SIZE,     // 4TiB
            max_range_count: MAX_RANGE_COUNT, // max_file_size / max_range_size
        }
    }
}

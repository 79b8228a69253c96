// Copyright 2024 sharefs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cmp::min;

use bytes::Bytes;
use sharefs_types::range::{Range, RangeFlags, RangeList, RangeListFlags};
use sharefs_utils::readable_size::ReadableSize;
use snafu::{OptionExt, ResultExt};
use tracing::{debug, error, instrument, trace};

use crate::backend::ShareBackendRef;
use crate::config::Config;
use crate::err::{JoinSnafu, RangeDataMissingSnafu, Result};
use crate::lock::PathLocks;
use crate::range_size::calculate_range_size;

/// Adapter between random-access file writes and a share whose only
/// write primitive is a bounded, offset-addressed range upload.
///
/// `write` is the single-shot reconciliation path for one direct offset
/// write; `stage_and_commit` flushes a batch of pending ranges under
/// per-path exclusion. Everything else is a thin passthrough kept here
/// because the write paths and their tests need it.
pub struct FileShare {
    backend: ShareBackendRef,
    config: Config,
    range_locks: PathLocks,
}

impl FileShare {
    pub fn new(backend: ShareBackendRef, config: Config) -> Self {
        Self {
            backend,
            config,
            range_locks: PathLocks::new(),
        }
    }

    /// The file's known committed extents, fetched fresh from the backend.
    ///
    /// A file with no committed extents yet is reported as a small file,
    /// not as an error.
    #[instrument(skip(self))]
    pub async fn get_file_range_offsets(&self, path: &str) -> Result<RangeList> {
        let extents = self.backend.list_ranges(path).await?;

        let mut list = RangeList::new();
        if extents.is_empty() {
            list.flags.insert(RangeListFlags::SMALL_FILE);
            return Ok(list);
        }
        for (start, end) in extents {
            list.push(Range::new_known(start, end));
        }
        Ok(list)
    }

    /// Write `data` at `offset`, resizing the remote file first when the
    /// write reaches past the known end of file.
    ///
    /// Issues exactly one range upload. Concurrent writes to the same
    /// path are not serialized here; one open handle means one writer.
    #[instrument(skip(self, data), fields(write_len = data.len()))]
    pub async fn write(&self, path: &str, offset: u64, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let known = self.get_file_range_offsets(path).await?;
        let plan = known.find_ranges_to_modify(offset, data.len() as u64);
        if plan.exceeds_known_extent {
            self.truncate(path, offset + data.len() as u64).await?;
        }

        if let Err(e) = self
            .backend
            .upload_range(path, offset, Bytes::copy_from_slice(data))
            .await
        {
            error!("failed to write {} bytes to {path} at {offset}: {e}", data.len());
            return Err(e);
        }
        Ok(())
    }

    /// Flush a batch of pending ranges to the remote file.
    ///
    /// Holds the path's lock for the whole call so two commit sequences
    /// for one file can never interleave. Ranges are taken in list
    /// order; a truncated range uploads zeros, a dirty range uploads its
    /// staged payload, and flags clear only after that range's upload
    /// succeeded. The first failure aborts the rest: ranges uploaded
    /// before it stay committed remotely, so callers must re-derive
    /// pending state from `get_file_range_offsets` before retrying.
    #[instrument(skip(self, pending))]
    pub async fn stage_and_commit(&self, path: &str, pending: &mut RangeList) -> Result<()> {
        let mtx = self.range_locks.get(path);
        let _guard = mtx.lock().await;
        trace!("committing {} pending ranges to {path}", pending.ranges.len());

        for rng in pending.ranges.iter_mut() {
            if rng.flags.is_empty() {
                continue;
            }
            let payload = if rng.is_truncated() {
                Bytes::from(vec![0u8; rng.len() as usize])
            } else {
                rng.data.clone().context(RangeDataMissingSnafu {
                    start: rng.start,
                    end: rng.end,
                })?
            };
            if let Err(e) = self.backend.upload_range(path, rng.start, payload).await {
                error!("failed to upload range {rng} of {path}: {e}");
                return Err(e);
            }
            rng.flags = RangeFlags::empty();
            rng.data = None;
        }
        Ok(())
    }

    /// Resize the remote file to a smaller, equal, or bigger size.
    pub async fn truncate(&self, path: &str, size: u64) -> Result<()> {
        debug!("resize {path} to {}", ReadableSize(size));
        self.backend.resize(path, size).await
    }

    pub async fn create_file(&self, path: &str) -> Result<()> {
        self.backend.create(path, 0).await
    }

    pub async fn delete_file(&self, path: &str) -> Result<()> {
        self.backend.delete(path).await
    }

    /// Upload a whole buffer as a fresh file.
    ///
    /// The buffer is decomposed into ranges sized by
    /// [calculate_range_size] and the ranges are uploaded concurrently;
    /// the first failure wins.
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn upload_buffer(&self, path: &str, data: &[u8]) -> Result<()> {
        let size = data.len() as u64;
        let range_size = calculate_range_size(size, &self.config)?;
        debug!("uploading {path} with range size {}", ReadableSize(range_size));

        self.backend.create(path, size).await?;
        if data.is_empty() {
            return Ok(());
        }

        let mut handles = Vec::new();
        let mut offset = 0u64;
        while offset < size {
            let end = min(offset + range_size, size);
            let chunk = Bytes::copy_from_slice(&data[offset as usize..end as usize]);
            let backend = self.backend.clone();
            let path = path.to_string();
            let handle =
                tokio::spawn(async move { backend.upload_range(&path, offset, chunk).await });
            handles.push(handle);
            offset = end;
        }

        for r in futures::future::join_all(handles).await {
            r.context(JoinSnafu)??;
        }
        Ok(())
    }
}

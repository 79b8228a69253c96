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

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use sharefs_types::props::Properties;

use crate::err::Result;

/// The remote file service the adapter reconciles against.
///
/// Files on the service are whole pre-sized objects; the only write
/// primitive is an offset-addressed range upload bounded by the service's
/// per-call size ceiling, and a file must be resized before any offset
/// beyond its current length can be written. Credentials, wire protocol
/// and retries all live behind an implementation of this trait.
#[async_trait]
pub trait ShareBackend: Send + Sync + 'static {
    async fn get_properties(&self, path: &str) -> Result<Properties>;

    /// Create the file pre-sized to `size` bytes, replacing any existing
    /// file at `path`.
    async fn create(&self, path: &str, size: u64) -> Result<()>;

    async fn delete(&self, path: &str) -> Result<()>;

    /// Resize the file to a smaller, equal, or bigger size.
    async fn resize(&self, path: &str, new_size: u64) -> Result<()>;

    /// Upload one contiguous range; `[offset, offset + data.len())` must
    /// fall inside the current file size.
    async fn upload_range(&self, path: &str, offset: u64, data: Bytes) -> Result<()>;

    /// The file's committed extents as ascending, end-exclusive pairs.
    async fn list_ranges(&self, path: &str) -> Result<Vec<(u64, u64)>>;
}

pub type ShareBackendRef = Arc<dyn ShareBackend>;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use rangemap::RangeSet;
use sharefs_types::props::Properties;
use snafu::OptionExt;

use crate::backend::ShareBackend;
use crate::err::{InvalidRangeSnafu, NotFoundSnafu, Result};

#[derive(Debug)]
struct FileState {
    size: u64,
    data: Vec<u8>,
    /// Extents that have actually been written, coalesced.
    written: RangeSet<u64>,
}

/// In-memory [ShareBackend] for tests and local development.
///
/// Mimics the service contract: files are pre-sized, a range upload
/// outside the current size is rejected, and the range listing reports
/// only extents that were explicitly written, merged when adjacent.
#[derive(Debug, Default)]
pub struct MemoryShare {
    files: DashMap<String, FileState>,
}

impl MemoryShare {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    /// Full file contents, for test verification.
    pub fn content(&self, path: &str) -> Option<Bytes> {
        self.files
            .get(path)
            .map(|state| Bytes::copy_from_slice(&state.data))
    }
}

#[async_trait]
impl ShareBackend for MemoryShare {
    async fn get_properties(&self, path: &str) -> Result<Properties> {
        let state = self.files.get(path).context(NotFoundSnafu { path })?;
        Ok(Properties::with_size(state.size))
    }

    async fn create(&self, path: &str, size: u64) -> Result<()> {
        self.files.insert(
            path.to_string(),
            FileState {
                size,
                data: vec![0u8; size as usize],
                written: RangeSet::new(),
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.files
            .remove(path)
            .map(|_| ())
            .context(NotFoundSnafu { path })
    }

    async fn resize(&self, path: &str, new_size: u64) -> Result<()> {
        let mut state = self.files.get_mut(path).context(NotFoundSnafu { path })?;
        if new_size < state.size {
            state.written.remove(new_size..u64::MAX);
        }
        state.size = new_size;
        state.data.resize(new_size as usize, 0);
        Ok(())
    }

    async fn upload_range(&self, path: &str, offset: u64, data: Bytes) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let mut state = self.files.get_mut(path).context(NotFoundSnafu { path })?;
        let end = offset + data.len() as u64;
        snafu::ensure!(
            end <= state.size,
            InvalidRangeSnafu {
                path,
                offset,
                len: data.len() as u64,
                size: state.size,
            }
        );
        state.data[offset as usize..end as usize].copy_from_slice(&data);
        state.written.insert(offset..end);
        Ok(())
    }

    async fn list_ranges(&self, path: &str) -> Result<Vec<(u64, u64)>> {
        let state = self.files.get(path).context(NotFoundSnafu { path })?;
        Ok(state.written.iter().map(|r| (r.start, r.end)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_stat() {
        let mem = MemoryShare::new();
        mem.create("f", 128).await.unwrap();
        let props = mem.get_properties("f").await.unwrap();
        assert_eq!(props.size, 128);

        let err = mem.get_properties("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn upload_outside_file_bounds_is_rejected() {
        let mem = MemoryShare::new();
        mem.create("f", 10).await.unwrap();

        let err = mem
            .upload_range("f", 8, Bytes::from_static(b"xxx"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidRange { .. }));

        // fits exactly
        mem.upload_range("f", 7, Bytes::from_static(b"xxx"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listing_coalesces_adjacent_uploads() {
        let mem = MemoryShare::new();
        mem.create("f", 300).await.unwrap();
        mem.upload_range("f", 0, Bytes::from(vec![1u8; 100]))
            .await
            .unwrap();
        mem.upload_range("f", 100, Bytes::from(vec![2u8; 100]))
            .await
            .unwrap();

        assert_eq!(mem.list_ranges("f").await.unwrap(), vec![(0, 200)]);
    }

    #[tokio::test]
    async fn resize_grows_with_zeros_and_clamps_extents_on_shrink() {
        let mem = MemoryShare::new();
        mem.create("f", 4).await.unwrap();
        mem.upload_range("f", 0, Bytes::from_static(b"abcd"))
            .await
            .unwrap();

        mem.resize("f", 8).await.unwrap();
        assert_eq!(
            mem.content("f").unwrap().as_ref(),
            b"abcd\x00\x00\x00\x00"
        );
        // the grown tail is not a written extent
        assert_eq!(mem.list_ranges("f").await.unwrap(), vec![(0, 4)]);

        mem.resize("f", 2).await.unwrap();
        assert_eq!(mem.content("f").unwrap().as_ref(), b"ab");
        assert_eq!(mem.list_ranges("f").await.unwrap(), vec![(0, 2)]);
    }

    #[tokio::test]
    async fn delete_missing_file_is_an_error() {
        let mem = MemoryShare::new();
        mem.create("f", 0).await.unwrap();
        mem.delete("f").await.unwrap();
        assert!(mem.delete("f").await.unwrap_err().is_not_found());
    }
}

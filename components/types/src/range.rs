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

use std::fmt::{Display, Formatter};

use bitflags::bitflags;
use bytes::Bytes;
use sharefs_common::{FileOffset, RangeLength};

bitflags! {
    #[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
    pub struct RangeFlags: u8 {
        /// The range carries local content that has not been committed yet.
        const DIRTY = 0x01;
        /// The range only extends the file length; its content is not real
        /// data and must be zero-filled before upload.
        const TRUNCATED = 0x02;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
    pub struct RangeListFlags: u8 {
        /// The remote file reported no committed ranges at all.
        const SMALL_FILE = 0x01;
    }
}

/// One contiguous byte extent `[start, end)` of a remote file, addressable
/// as an independent upload unit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Range {
    pub start: FileOffset,
    /// Exclusive.
    pub end: FileOffset,
    /// Populated only while the range has pending local content.
    pub data: Option<Bytes>,
    pub flags: RangeFlags,
}

impl Range {
    /// A committed extent reported by the backend; no flags, no payload.
    pub fn new_known(start: FileOffset, end: FileOffset) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            end,
            data: None,
            flags: RangeFlags::empty(),
        }
    }

    /// A pending range staged with local content.
    pub fn new_dirty(start: FileOffset, data: Bytes) -> Self {
        Self {
            start,
            end: start + data.len() as u64,
            data: Some(data),
            flags: RangeFlags::DIRTY,
        }
    }

    /// A pending range created purely to extend the file length.
    pub fn new_truncated(start: FileOffset, end: FileOffset) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            end,
            data: None,
            flags: RangeFlags::TRUNCATED,
        }
    }

    pub fn len(&self) -> RangeLength { self.end - self.start }

    pub fn is_empty(&self) -> bool { self.start == self.end }

    pub fn is_dirty(&self) -> bool { self.flags.contains(RangeFlags::DIRTY) }

    pub fn is_truncated(&self) -> bool { self.flags.contains(RangeFlags::TRUNCATED) }

    /// True when `[start, end)` intersects `[offset, offset + len)`.
    pub fn overlaps(&self, offset: FileOffset, len: RangeLength) -> bool {
        self.start < offset + len && offset < self.end
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// How a write request relates to the currently known extents of a file.
///
/// Produced by [RangeList::find_ranges_to_modify]; pure bookkeeping, no
/// backend calls.
#[derive(Debug, Default)]
pub struct WritePlan {
    /// Known ranges entirely before the write window.
    pub before: Vec<Range>,
    /// Known ranges entirely after the write window.
    pub after: Vec<Range>,
    /// Known ranges intersecting the write window. Partial overwrites are
    /// expressed as new ranges covering exactly the written span, never as
    /// in-place edits of these records.
    pub overlapping: Vec<Range>,
    /// The write extends past the known end of file, so the file must be
    /// resized before the upload can proceed.
    pub exceeds_known_extent: bool,
}

/// Ordered, non-overlapping, ascending sequence of [Range].
///
/// Represents either the remote file's currently known committed extents
/// or a pending write's decomposition. Each call path owns its own
/// instance; nothing here is shared across writers.
#[derive(Debug, Default)]
pub struct RangeList {
    pub ranges: Vec<Range>,
    pub flags: RangeListFlags,
}

impl RangeList {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, range: Range) {
        debug_assert!(
            self.ranges.last().map_or(true, |last| last.end <= range.start),
            "ranges must stay ascending and non-overlapping"
        );
        self.ranges.push(range);
    }

    pub fn is_small_file(&self) -> bool { self.flags.contains(RangeListFlags::SMALL_FILE) }

    /// The known end of file: the max `end` across ranges, 0 when empty.
    pub fn known_end(&self) -> FileOffset {
        self.ranges.iter().map(|r| r.end).max().unwrap_or(0)
    }

    /// Classify a write `[offset, offset + len)` against the known extents.
    pub fn find_ranges_to_modify(&self, offset: FileOffset, len: RangeLength) -> WritePlan {
        let write_end = offset + len;
        let mut plan = WritePlan {
            exceeds_known_extent: write_end > self.known_end(),
            ..Default::default()
        };

        for range in &self.ranges {
            if range.end <= offset {
                plan.before.push(range.clone());
            } else if range.start >= write_end {
                plan.after.push(range.clone());
            } else {
                plan.overlapping.push(range.clone());
            }
        }
        plan
    }
}

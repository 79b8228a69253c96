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

/// The largest payload a single range upload may carry.
pub const MAX_RANGE_SIZE: u64 = 4 << 20; // 4 MiB

/// The largest file the share can represent.
pub const MAX_FILE_SIZE: u64 = 4 << 40; // 4 TiB

/// How many ranges one file can be decomposed into at most.
pub const MAX_RANGE_COUNT: u64 = MAX_FILE_SIZE / MAX_RANGE_SIZE;

/// Computed range sizes are rounded up to a multiple of this.
pub const RANGE_SIZE_ALIGNMENT: u64 = 8;

pub type FileOffset = u64;
pub type RangeLength = u64;

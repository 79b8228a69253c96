use sharefs_common::RANGE_SIZE_ALIGNMENT;
use snafu::ensure;

use crate::config::Config;
use crate::err::{FileTooLargeSnafu, RangeSizeExceededSnafu, Result};

/// Pick the range size to use when uploading a file of `file_size` bytes.
///
/// Files no larger than one range are always uploaded with the maximum
/// range size regardless of their actual content length. Bigger files get
/// `ceil(file_size / max_range_count)`, clamped up to the maximum range
/// size and rounded up to a multiple of 8; when even that cannot fit the
/// file under the per-file range-count ceiling the file is not
/// representable on the share.
pub fn calculate_range_size(file_size: u64, config: &Config) -> Result<u64> {
    ensure!(
        file_size <= config.max_file_size,
        FileTooLargeSnafu {
            size: file_size,
            max: config.max_file_size,
        }
    );

    if file_size <= config.max_range_size {
        return Ok(config.max_range_size);
    }

    let mut range_size = file_size.div_ceil(config.max_range_count);
    if range_size < config.max_range_size {
        range_size = config.max_range_size;
    } else {
        if range_size % RANGE_SIZE_ALIGNMENT != 0 {
            range_size = (range_size / RANGE_SIZE_ALIGNMENT + 1) * RANGE_SIZE_ALIGNMENT;
        }
        ensure!(
            range_size <= config.max_range_size,
            RangeSizeExceededSnafu {
                range_size,
                max: config.max_range_size,
            }
        );
    }

    Ok(range_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn small_files_always_get_the_max_range_size() {
        let config = Config::default();
        for file_size in [0, 1, 4096, config.max_range_size] {
            assert_eq!(
                calculate_range_size(file_size, &config).unwrap(),
                config.max_range_size,
            );
        }
    }

    #[test]
    fn oversized_file_is_rejected() {
        let config = Config::default();
        let err = calculate_range_size(config.max_file_size + 1, &config).unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { .. }));
    }

    #[test]
    fn large_files_split_under_the_count_ceiling() {
        let config = Config::default();
        // anything between one range and the max file size clamps to the
        // max range size under the default limits
        let range_size =
            calculate_range_size(config.max_range_size * 3 + 17, &config).unwrap();
        assert_eq!(range_size, config.max_range_size);

        let range_size = calculate_range_size(config.max_file_size, &config).unwrap();
        assert_eq!(range_size, config.max_range_size);
    }

    #[test]
    fn below_ceiling_split_clamps_up_to_the_range_size() {
        let config = Config {
            max_range_size: 4096,
            max_file_size: 1 << 20,
            max_range_count: 3,
        };
        // ceil(10_000 / 3) = 3334 < 4096: clamp wins
        assert_eq!(calculate_range_size(10_000, &config).unwrap(), 4096);
    }

    #[test]
    fn exact_count_fit_passes_through_when_aligned() {
        let config = Config {
            max_range_size: 2000,
            max_file_size: 1 << 20,
            max_range_count: 3,
        };
        // ceil(6_000 / 3) = 2000, already a multiple of 8
        assert_eq!(calculate_range_size(6_000, &config).unwrap(), 2000);
    }

    #[test]
    fn unaligned_ceiling_rounds_up_and_overflows() {
        let config = Config {
            max_range_size: 2001,
            max_file_size: 1 << 20,
            max_range_count: 3,
        };
        // ceil(6_003 / 3) = 2001, rounded up to 2008 > 2001
        let err = calculate_range_size(6_003, &config).unwrap_err();
        assert!(matches!(err, Error::RangeSizeExceeded { .. }));
    }

    #[test]
    fn result_never_exceeds_the_upload_ceiling() {
        let config = Config {
            max_range_size: 1024,
            max_file_size: 1 << 20,
            max_range_count: 4,
        };
        // ceil(8_000 / 4) = 2000 > 1024: unrepresentable
        let err = calculate_range_size(8_000, &config).unwrap_err();
        assert!(matches!(err, Error::RangeSizeExceeded { .. }));
    }

    #[test]
    fn result_is_max_range_size_or_a_multiple_of_eight() {
        let config = Config {
            max_range_size: 4096,
            max_file_size: 1 << 22,
            max_range_count: 700,
        };
        for file_size in (0..(1 << 22)).step_by(131_071) {
            if let Ok(range_size) = calculate_range_size(file_size, &config) {
                assert!(range_size <= config.max_range_size);
                assert!(
                    range_size == config.max_range_size || range_size % 8 == 0,
                    "file_size={file_size} range_size={range_size}"
                );
            }
        }
    }
}

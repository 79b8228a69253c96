use snafu::{Location, Snafu};

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{path} does not exist"))]
    NotFound {
        path: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("file of {size} bytes exceeds the {max} bytes the share can hold"))]
    FileTooLarge {
        size: u64,
        max: u64,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("range size {range_size} exceeds the {max} bytes upload ceiling"))]
    RangeSizeExceeded {
        range_size: u64,
        max: u64,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "range [{offset}, {}) of {path} is outside the file of {size} bytes",
        offset + len
    ))]
    InvalidRange {
        path: String,
        offset: u64,
        len: u64,
        size: u64,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("dirty range [{start}, {end}) has no staged payload"))]
    RangeDataMissing {
        start: u64,
        end: u64,
        #[snafu(implicit)]
        location: Location,
    },

    Join {
        #[snafu(implicit)]
        location: Location,
        source: tokio::task::JoinError,
    },

    #[snafu(display("backend request failed"))]
    Backend {
        #[snafu(implicit)]
        location: Location,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool { matches!(self, Error::NotFound { .. }) }
}

pub type Result<T> = std::result::Result<T, Error>;

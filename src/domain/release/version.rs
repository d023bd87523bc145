//! Semantic version triple
//!
//! Versions are written `major.minor.patch`. A leading non-digit prefix such
//! as `v` is accepted and dropped; anything after the patch number (pre-release
//! tags, build metadata) is rejected.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Malformed version string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("version string is empty")]
    Empty,

    #[error("version {input:?} contains no digits")]
    NoDigits { input: String },

    #[error("version {input:?} has {found} segment(s), expected major.minor.patch")]
    SegmentCount { input: String, found: usize },

    #[error("version {input:?} has an invalid {segment} segment {value:?}")]
    InvalidSegment {
        input: String,
        segment: &'static str,
        value: String,
    },

    #[error("version {input:?} has a {segment} segment that does not fit in 64 bits")]
    Overflow { input: String, segment: &'static str },
}

/// `(major, minor, patch)`, ordered lexicographically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

const SEGMENT_NAMES: [&str; 3] = ["major", "minor", "patch"];

/// Parse `<prefix><int>.<int>.<int>`.
pub fn parse_version(input: &str) -> Result<Version, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let body = trimmed.trim_start_matches(|c: char| !c.is_ascii_digit());
    if body.is_empty() {
        return Err(ParseError::NoDigits {
            input: input.to_string(),
        });
    }

    let segments: Vec<&str> = body.split('.').collect();
    if segments.len() != SEGMENT_NAMES.len() {
        return Err(ParseError::SegmentCount {
            input: input.to_string(),
            found: segments.len(),
        });
    }

    let mut numbers = [0u64; 3];
    for ((slot, value), segment) in numbers.iter_mut().zip(&segments).zip(SEGMENT_NAMES) {
        // u64::from_str would also take a leading '+'
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidSegment {
                input: input.to_string(),
                segment,
                value: value.to_string(),
            });
        }
        *slot = value.parse().map_err(|_| ParseError::Overflow {
            input: input.to_string(),
            segment,
        })?;
    }

    let [major, minor, patch] = numbers;
    Ok(Version::new(major, minor, patch))
}

/// Lexicographic comparison on `(major, minor, patch)`.
pub fn compare_versions(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}

/// `-1`, `0` or `1` for an [`Ordering`].
pub fn ordering_sign(ordering: Ordering) -> i8 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_version(&raw).map_err(serde::de::Error::custom)
    }
}

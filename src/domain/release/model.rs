//! Release descriptor

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::version::{parse_version, ParseError, Version};

/// Snapshot of the latest known NetBird release.
///
/// `last_checked` travels as UTC epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetbirdRelease {
    /// Serialized [`Version`] of the newest release
    pub latest_version: String,
    /// When the release metadata was retrieved
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_checked: DateTime<Utc>,
    /// Download location
    pub url: String,
}

impl NetbirdRelease {
    pub fn new(
        latest_version: impl Into<String>,
        last_checked: DateTime<Utc>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            latest_version: latest_version.into(),
            last_checked,
            url: url.into(),
        }
    }

    /// Parsed form of `latest_version`.
    pub fn latest(&self) -> Result<Version, ParseError> {
        parse_version(&self.latest_version)
    }

    /// Time elapsed since the snapshot was taken.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.last_checked)
    }
}

/// True iff the release is strictly newer than `current`.
pub fn is_update_available(current: &Version, release: &NetbirdRelease) -> Result<bool, ParseError> {
    Ok(release.latest()? > *current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn release(latest: &str) -> NetbirdRelease {
        NetbirdRelease::new(
            latest,
            Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
            "https://pkgs.netbird.io/releases/latest",
        )
    }

    #[test]
    fn newer_release_is_an_update() {
        let current = Version::new(1, 0, 0);
        assert_eq!(is_update_available(&current, &release("1.2.0")), Ok(true));
    }

    #[test]
    fn older_release_is_not_an_update() {
        let current = Version::new(2, 0, 0);
        assert_eq!(is_update_available(&current, &release("1.9.9")), Ok(false));
    }

    #[test]
    fn same_release_is_not_an_update() {
        let current = Version::new(0, 28, 4);
        assert_eq!(is_update_available(&current, &release("v0.28.4")), Ok(false));
    }

    #[test]
    fn malformed_latest_version_propagates() {
        let current = Version::new(1, 0, 0);
        assert!(matches!(
            is_update_available(&current, &release("1.2")),
            Err(ParseError::SegmentCount { .. })
        ));
    }

    #[test]
    fn last_checked_is_epoch_millis_on_the_wire() {
        let r = release("0.28.4");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["last_checked"], 1_700_000_000_123i64);

        let back: NetbirdRelease = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn age_is_measured_from_last_checked() {
        let r = release("0.28.4");
        let later = r.last_checked + Duration::minutes(5);
        assert_eq!(r.age(later), Duration::minutes(5));
    }
}

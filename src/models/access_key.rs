use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::constants::keys::MAX_VALIDITY_DAYS;
use crate::entities::access_keys;

/// Latest year an expiry may land in; later timestamps do not round-trip through the store.
const MAX_EXPIRY_YEAR: i32 = 9999;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Validity must be between 1 and {MAX_VALIDITY_DAYS} days")]
pub struct ExpiryOutOfRange;

/// An admin-issued key that unlocks the catalog and scopes reading state.
#[derive(Debug, Clone, Serialize)]
pub struct AccessKey {
    pub id: i32,
    pub key_value: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<access_keys::Model> for AccessKey {
    fn from(model: access_keys::Model) -> Self {
        Self {
            id: model.id,
            key_value: model.key_value,
            user_name: model.user_name,
            user_email: model.user_email,
            is_active: model.is_active,
            expires_at: model.expires_at,
            last_used_at: model.last_used_at,
            created_at: model.created_at,
        }
    }
}

impl AccessKey {
    /// A key unlocks content only while active and, if it expires, strictly before expiry.
    #[must_use]
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|expires| expires > now)
    }

    #[must_use]
    pub fn summary(&self) -> KeySummary {
        KeySummary {
            key_id: self.id,
            key_value: self.key_value.clone(),
            is_active: self.is_active,
            expires_at: self.expires_at,
        }
    }
}

/// Key fields embedded in user payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySummary {
    pub key_id: i32,
    pub key_value: String,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewAccessKey {
    pub key_value: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// `from + days`, bounded to `1..=MAX_VALIDITY_DAYS` and to representable dates.
pub fn checked_expiry(
    from: DateTime<Utc>,
    days: i64,
) -> Result<DateTime<Utc>, ExpiryOutOfRange> {
    if !(1..=MAX_VALIDITY_DAYS).contains(&days) {
        return Err(ExpiryOutOfRange);
    }

    Duration::try_days(days)
        .and_then(|delta| from.checked_add_signed(delta))
        .filter(|expiry| expiry.year() <= MAX_EXPIRY_YEAR)
        .ok_or(ExpiryOutOfRange)
}

/// New expiry after extending by `days`. Keys without an expiry extend from `now`.
pub fn extended_expiry(
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    days: i64,
) -> Result<DateTime<Utc>, ExpiryOutOfRange> {
    checked_expiry(current.unwrap_or(now), days)
}

/// Absent or non-positive `days` means the key never expires.
pub fn expiry_after_days(
    now: DateTime<Utc>,
    days: Option<i64>,
) -> Result<Option<DateTime<Utc>>, ExpiryOutOfRange> {
    days.filter(|d| *d > 0)
        .map(|d| checked_expiry(now, d))
        .transpose()
}

/// `KEY_<USERNAME>_<unix millis>`
#[must_use]
pub fn generated_key_value(username: &str, now: DateTime<Utc>) -> String {
    format!("KEY_{}_{}", username.to_uppercase(), now.timestamp_millis())
}

/// `PREFIX_0001`, `PREFIX_0002`, ...
#[must_use]
pub fn bulk_key_value(prefix: &str, index: u32) -> String {
    format!("{prefix}_{index:04}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn key(is_active: bool, expires_at: Option<DateTime<Utc>>) -> AccessKey {
        AccessKey {
            id: 1,
            key_value: "K".to_string(),
            user_name: None,
            user_email: None,
            is_active,
            expires_at,
            last_used_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_usable_without_expiry() {
        assert!(key(true, None).is_usable_at(Utc::now()));
    }

    #[test]
    fn test_inactive_key_is_never_usable() {
        assert!(!key(false, None).is_usable_at(Utc::now()));
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        assert!(!key(true, Some(now)).is_usable_at(now));
        assert!(!key(true, Some(now - Duration::seconds(1))).is_usable_at(now));
        assert!(key(true, Some(now + Duration::seconds(1))).is_usable_at(now));
    }

    #[test]
    fn test_extend_from_existing_expiry() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let current = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let extended = extended_expiry(Some(current), now, 10).unwrap();
        assert_eq!(extended, Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_extend_null_expiry_starts_from_now() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            extended_expiry(None, now, 30).unwrap(),
            now + Duration::days(30)
        );
    }

    #[test]
    fn test_expiry_after_days_ignores_non_positive() {
        let now = Utc::now();
        assert_eq!(expiry_after_days(now, None), Ok(None));
        assert_eq!(expiry_after_days(now, Some(0)), Ok(None));
        assert_eq!(
            expiry_after_days(now, Some(2)),
            Ok(Some(now + Duration::days(2)))
        );
    }

    #[test]
    fn test_oversized_validity_is_rejected() {
        let now = Utc::now();
        assert_eq!(extended_expiry(None, now, 9_000_000_000_000), Err(ExpiryOutOfRange));
        assert_eq!(expiry_after_days(now, Some(200_000_000)), Err(ExpiryOutOfRange));
        assert_eq!(expiry_after_days(now, Some(i64::MAX)), Err(ExpiryOutOfRange));
        assert!(extended_expiry(None, now, MAX_VALIDITY_DAYS).is_ok());
    }

    #[test]
    fn test_extension_cannot_pass_year_9999() {
        let now = Utc::now();
        let far = Utc.with_ymd_and_hms(9990, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(extended_expiry(Some(far), now, 36_500), Err(ExpiryOutOfRange));
    }

    #[test]
    fn test_key_value_formats() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(generated_key_value("alice", now), "KEY_ALICE_1700000000123");
        assert_eq!(bulk_key_value("VIP", 7), "VIP_0007");
        assert_eq!(bulk_key_value("KEY", 12345), "KEY_12345");
    }
}

use super::ApiError;
use crate::constants::keys::MAX_VALIDITY_DAYS;

/// Parses a positive numeric id from a path segment.
pub fn parse_id(raw: &str, what: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation(format!(
            "Invalid {what} ID: {raw}. ID must be a positive integer"
        ))),
    }
}

pub fn validate_chapter_number(number: i32) -> Result<i32, ApiError> {
    if number <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid chapter number: {number}. Chapter must be a positive integer"
        )));
    }
    Ok(number)
}

/// Chapter numbers start at 1, so 0 and blanks mean "whole comic".
#[must_use]
pub fn normalize_chapter(number: Option<i32>) -> Option<i32> {
    number.filter(|n| *n > 0)
}

/// Query-string form of [`normalize_chapter`]: empty, `null` and non-numeric values are `None`.
#[must_use]
pub fn parse_optional_chapter(raw: Option<&str>) -> Option<i32> {
    normalize_chapter(raw.and_then(|s| s.trim().parse::<i32>().ok()))
}

pub fn validate_days(days: Option<i64>) -> Result<i64, ApiError> {
    match days {
        Some(days) if days > MAX_VALIDITY_DAYS => Err(ApiError::validation(format!(
            "Extension days cannot exceed {MAX_VALIDITY_DAYS}"
        ))),
        Some(days) if days > 0 => Ok(days),
        _ => Err(ApiError::validation(
            "Extension days must be greater than 0",
        )),
    }
}

/// Optional validity for new keys: absent or non-positive means "never expires".
pub fn validate_expires_days(days: Option<i64>) -> Result<Option<i64>, ApiError> {
    match days {
        Some(days) if days > MAX_VALIDITY_DAYS => Err(ApiError::validation(format!(
            "expires_days cannot exceed {MAX_VALIDITY_DAYS}"
        ))),
        Some(days) if days > 0 => Ok(Some(days)),
        _ => Ok(None),
    }
}

pub fn validate_bulk_count(count: u32, max: u32) -> Result<u32, ApiError> {
    if count == 0 || count > max {
        return Err(ApiError::validation(format!(
            "Invalid count: {count}. Count must be between 1 and {max}"
        )));
    }
    Ok(count)
}

pub fn validate_key_prefix(prefix: &str) -> Result<&str, ApiError> {
    let trimmed = prefix.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Prefix cannot be empty"));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "Prefix can only contain letters, numbers, hyphens, and underscores",
        ));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12", "comic").unwrap(), 12);
        assert!(parse_id("0", "comic").is_err());
        assert!(parse_id("-4", "comic").is_err());
        assert!(parse_id("abc", "comic").is_err());
    }

    #[test]
    fn test_chapter_normalization() {
        assert_eq!(normalize_chapter(Some(3)), Some(3));
        assert_eq!(normalize_chapter(Some(0)), None);
        assert_eq!(parse_optional_chapter(Some("7")), Some(7));
        assert_eq!(parse_optional_chapter(Some("")), None);
        assert_eq!(parse_optional_chapter(Some("null")), None);
        assert_eq!(parse_optional_chapter(None), None);
    }

    #[test]
    fn test_validate_days() {
        assert_eq!(validate_days(Some(30)).unwrap(), 30);
        assert!(validate_days(Some(0)).is_err());
        assert!(validate_days(Some(-2)).is_err());
        assert!(validate_days(None).is_err());
        assert!(validate_days(Some(MAX_VALIDITY_DAYS)).is_ok());
        assert!(validate_days(Some(MAX_VALIDITY_DAYS + 1)).is_err());
        assert!(validate_days(Some(9_000_000_000_000)).is_err());
    }

    #[test]
    fn test_validate_expires_days() {
        assert_eq!(validate_expires_days(None).unwrap(), None);
        assert_eq!(validate_expires_days(Some(0)).unwrap(), None);
        assert_eq!(validate_expires_days(Some(30)).unwrap(), Some(30));
        assert!(validate_expires_days(Some(200_000_000)).is_err());
    }

    #[test]
    fn test_validate_bulk_inputs() {
        assert!(validate_bulk_count(10, 1000).is_ok());
        assert!(validate_bulk_count(0, 1000).is_err());
        assert!(validate_bulk_count(1001, 1000).is_err());

        assert_eq!(validate_key_prefix(" VIP ").unwrap(), "VIP");
        assert!(validate_key_prefix("").is_err());
        assert!(validate_key_prefix("a b").is_err());
    }
}

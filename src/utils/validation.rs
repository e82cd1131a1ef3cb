use crate::utils::error::{ReadingError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> ReadingError {
    ReadingError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Only absolute http(s) URLs are accepted for the reading server.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReadingError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// 檢查點擊的卡槽是否在牌面範圍內
pub fn validate_slot_indices(field_name: &str, indices: &[usize], total_slots: usize) -> Result<()> {
    match indices.iter().find(|&&index| index >= total_slots) {
        Some(bad) => Err(invalid(
            field_name,
            bad,
            format!("Slot index must be below {}", total_slots),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("gateway.base_url", "https://example.com").is_ok());
        assert!(validate_url("gateway.base_url", "http://127.0.0.1:8000").is_ok());
        assert!(validate_url("gateway.base_url", "").is_err());
        assert!(validate_url("gateway.base_url", "invalid-url").is_err());
        assert!(validate_url("gateway.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("gateway.api_key", "V1").is_ok());
        assert!(matches!(
            validate_non_empty_string("gateway.api_key", "   "),
            Err(ReadingError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("gateway.timeout_seconds", 30u64, 1, 600).is_ok());
        assert!(validate_range("gateway.timeout_seconds", 0u64, 1, 600).is_err());
    }

    #[test]
    fn test_validate_slot_indices() {
        assert!(validate_slot_indices("select", &[0, 4, 8], 9).is_ok());
        assert!(validate_slot_indices("select", &[0, 9], 9).is_err());
        assert!(validate_path("storage.state_file", "").is_err());
    }
}

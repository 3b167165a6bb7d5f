//! Validation helpers
//!
//! Small checks shared by the controllers, plus body parsing that does not
//! care about the request `Content-Type`.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use validator::ValidationError;

use crate::utils::errors::{required_field_error, AppError, AppResult};

lazy_static! {
    static ref VEHICLE_NO_SEPARATORS: Regex = Regex::new(r"[\s\-_./]+").unwrap();
    static ref VEHICLE_NO_BODY: Regex = Regex::new(r"^[A-Z0-9]{4,15}$").unwrap();
    static ref UNSAFE_FILE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// Trimmed value of an optional text field, `None` when blank
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Required text field, trimmed
pub fn require_text(value: Option<String>, field: &str) -> AppResult<String> {
    non_blank(value).ok_or_else(|| required_field_error(field))
}

/// Validate that a string is not blank
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Validate a contact number (10 to 15 digits once formatting is removed)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(10..=15).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("must contain 10 to 15 digits".into());
        return Err(error);
    }
    Ok(())
}

/// Canonical registration number: upper-cased, trimmed, inner spacing collapsed
pub fn canonical_vehicle_no(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Validate a registration number such as `DL-01-AB-1234`
pub fn validate_vehicle_no(value: &str) -> Result<(), ValidationError> {
    let compact = VEHICLE_NO_SEPARATORS
        .replace_all(&value.trim().to_uppercase(), "")
        .into_owned();
    if !VEHICLE_NO_BODY.is_match(&compact) {
        let mut error = ValidationError::new("vehicle_no");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("must be 4 to 15 letters or digits".into());
        return Err(error);
    }
    Ok(())
}

/// Validate that a stage does not end before it starts
pub fn validate_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            let mut error = ValidationError::new("date_order");
            error.add_param("start".into(), &start.to_string());
            error.add_param("end".into(), &end.to_string());
            error.message = Some("end date is before start date".into());
            return Err(error);
        }
    }
    Ok(())
}

/// File name safe to embed in an object key
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_FILE_CHARS.replace_all(base.trim(), "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Parse a JSON body regardless of the declared content type
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(AppError::BadRequest("Request body is empty".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Sector 5 ".to_string())), Some("Sector 5".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some(" x ".to_string()), "name").unwrap(), "x");
        let err = require_text(Some(String::new()), "zone_name").unwrap_err();
        assert_eq!(err.to_string(), "Bad request: zone_name is required");
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765-43210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_vehicle_no() {
        assert!(validate_vehicle_no("DL-01-AB-1234").is_ok());
        assert!(validate_vehicle_no("hr 26 dk 8337").is_ok());
        assert!(validate_vehicle_no("AB1").is_err());
        assert!(validate_vehicle_no("DL-01-AB-1234-XYZ-999").is_err());
        assert!(validate_vehicle_no("DL#01").is_err());
    }

    #[test]
    fn test_canonical_vehicle_no() {
        assert_eq!(canonical_vehicle_no("  dl-01-ab-1234 "), "DL-01-AB-1234");
        assert_eq!(canonical_vehicle_no("hr  26   dk 8337"), "HR 26 DK 8337");
    }

    #[test]
    fn test_validate_date_order() {
        let first = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let tenth = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(validate_date_order(Some(first), Some(tenth)).is_ok());
        assert!(validate_date_order(Some(first), None).is_ok());
        assert!(validate_date_order(Some(tenth), Some(first)).is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("RC scan (front).pdf"), "RC_scan_front_.pdf");
        assert_eq!(sanitize_file_name("C:\\docs\\rc.jpg"), "rc.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("***"), "document");
    }

    #[test]
    fn test_parse_json_body() {
        #[derive(Deserialize)]
        struct Body {
            count: i64,
        }

        let body: Body = parse_json_body(br#"{"count": 3}"#).unwrap();
        assert_eq!(body.count, 3);
        assert!(parse_json_body::<Body>(b"  ").is_err());
        assert!(parse_json_body::<Body>(b"{not json").is_err());
    }
}

use serde::{Deserialize, Serialize};

/// Rows per page on paginated listings
pub const PAGE_SIZE: i64 = 50;

// Generic response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

// An id sent either as a JSON number or as a string (HTML selects send strings)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Number(i64),
    Text(String),
}

impl FlexibleId {
    /// Numeric value, if there is one
    pub fn as_id(&self) -> Option<i64> {
        match self {
            FlexibleId::Number(n) => Some(*n),
            FlexibleId::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Blank strings count as missing
    pub fn is_blank(&self) -> bool {
        matches!(self, FlexibleId::Text(s) if s.trim().is_empty())
    }
}

// Pagination block of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total_pages: i64,
    pub current_page: i64,
    pub total_records: i64,
}

impl Pagination {
    /// Clamp the requested page into `1..=total_pages`; an unreadable page
    /// number means the first page
    pub fn new(requested: Option<&str>, total_records: i64, page_size: i64) -> Self {
        let total_records = total_records.max(0);
        let total_pages = ((total_records + page_size - 1) / page_size).max(1);
        let requested = requested
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1);

        Self {
            total_pages,
            current_page: requested.clamp(1, total_pages),
            total_records,
        }
    }

    pub fn offset(&self, page_size: i64) -> i64 {
        (self.current_page - 1) * page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexible_id() {
        let number: FlexibleId = serde_json::from_str("42").unwrap();
        let text: FlexibleId = serde_json::from_str("\" 42 \"").unwrap();
        let name: FlexibleId = serde_json::from_str("\"HSR Layout\"").unwrap();

        assert_eq!(number.as_id(), Some(42));
        assert_eq!(text.as_id(), Some(42));
        assert_eq!(name.as_id(), None);
        assert!(FlexibleId::Text("  ".to_string()).is_blank());
        assert!(!number.is_blank());
    }

    #[test]
    fn test_pagination_basic() {
        let page = Pagination::new(Some("2"), 120, 50);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.offset(50), 50);
    }

    #[test]
    fn test_pagination_clamps() {
        assert_eq!(Pagination::new(Some("99"), 120, 50).current_page, 3);
        assert_eq!(Pagination::new(Some("0"), 120, 50).current_page, 1);
        assert_eq!(Pagination::new(Some("abc"), 120, 50).current_page, 1);
        assert_eq!(Pagination::new(None, 120, 50).current_page, 1);
    }

    #[test]
    fn test_pagination_empty_table() {
        let page = Pagination::new(Some("3"), 0, 50);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.offset(50), 0);
    }

    #[test]
    fn test_api_response_skips_empty_fields() {
        let body = serde_json::to_value(ApiResponse::message("Saved".to_string())).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "message": "Saved" }));
    }
}

use serde::{Deserialize, Serialize};

/// Envelope every JSON endpoint answers with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Pagination metadata for list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            pagination: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    pub fn error(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: Some(error.into()),
            pagination: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::error("Unauthorized", "Authorization header required")).unwrap();
        assert_eq!(
            body,
            json!({ "success": false, "error": "Unauthorized", "message": "Authorization header required" })
        );
    }

    #[test]
    fn test_paginated_envelope() {
        let response = ApiResponse::ok(vec![1, 2])
            .with_message("Available appointment slots")
            .with_pagination(Pagination { page: 1, limit: 2, total: 5, pages: 3 });
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body["pagination"], json!({ "page": 1, "limit": 2, "total": 5, "pages": 3 }));
        assert_eq!(body["data"], json!([1, 2]));
    }
}

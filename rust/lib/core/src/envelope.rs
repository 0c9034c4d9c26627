use serde::{Deserialize, Serialize};

use crate::ConsoleError;

/// Response envelope returned by every backend endpoint.
///
/// ```json
/// {"code": 200, "message": "ok", "data": {...}}
/// ```
///
/// `code` is the application status. Anything outside `200..300` is a
/// failure even when the HTTP transport succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { code: 200, message: "ok".into(), data: Some(data) }
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Unwrap the payload, mapping a failure code to [`ConsoleError::Business`].
    pub fn into_result(self) -> Result<Option<T>, ConsoleError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(ConsoleError::Business { code: self.code, message: self.message })
        }
    }

    /// Like [`into_result`](Self::into_result) but a missing `data` is a
    /// decode error.
    pub fn into_data(self) -> Result<T, ConsoleError> {
        self.into_result()?
            .ok_or_else(|| ConsoleError::Decode("envelope has no data".into()))
    }
}

/// Pagination parameters for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

impl Default for ListParams {
    fn default() -> Self {
        Self { page: default_page(), page_size: default_page_size(), keyword: None }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

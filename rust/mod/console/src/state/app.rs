//! App-level state.

use fmconsole_core::ConsoleError;
use serde::Serialize;

/// Current route. Stored at `app/route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AppRoute(pub String);

impl AppRoute {
    pub const PATH: &'static str = "app/route";
}

/// Last error worth showing to the user. Stored at `app/error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBanner {
    /// Stable code from [`ConsoleError::error_code`].
    pub code: String,
    pub message: String,
}

impl ErrorBanner {
    pub const PATH: &'static str = "app/error";
}

impl From<&ConsoleError> for ErrorBanner {
    fn from(err: &ConsoleError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

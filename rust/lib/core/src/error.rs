use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. The UI layer matches on these,
// never on the human-readable message string.

/// Stable error code constants.
pub mod error_code {
    pub const NETWORK: &str = "NETWORK";
    pub const TIMEOUT: &str = "TIMEOUT";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const CLIENT_ERROR: &str = "CLIENT_ERROR";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const BUSINESS_ERROR: &str = "BUSINESS_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

// ── ConsoleError ────────────────────────────────────────────────────

/// Unified error type for everything the console core does.
///
/// Transport failures (network, timeout, HTTP status) and application
/// failures (a failure `code` inside a 2xx envelope) are normalized into
/// this one shape before they reach state handlers, so callers never branch
/// on raw transport status and envelope code separately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Connection refused, reset, DNS failure. Retryable.
    #[error("network: {0}")]
    Network(String),

    /// Request exceeded the configured timeout. Retryable.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// HTTP 5xx. Retryable up to the attempt cap.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// HTTP 4xx other than 401/403. Never retried.
    #[error("request rejected {status}: {message}")]
    Client { status: u16, message: String },

    /// HTTP 401 or an expired credential. Forces logout.
    #[error("{0}")]
    Unauthorized(String),

    /// HTTP 403 or a route guard denial.
    #[error("{0}")]
    PermissionDenied(String),

    /// Envelope `code` outside 200..300 on a successful transport.
    #[error("{message} (code {code})")]
    Business { code: i64, message: String },

    /// Response body or credential could not be decoded.
    #[error("decode: {0}")]
    Decode(String),

    /// Session storage backend failure.
    #[error("storage: {0}")]
    Storage(String),

    /// Invalid configuration, including strict route generation failures.
    #[error("config: {0}")]
    Config(String),
}

impl ConsoleError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConsoleError::Network(_) => error_code::NETWORK,
            ConsoleError::Timeout(_) => error_code::TIMEOUT,
            ConsoleError::Server { .. } => error_code::SERVER_ERROR,
            ConsoleError::Client { .. } => error_code::CLIENT_ERROR,
            ConsoleError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ConsoleError::PermissionDenied(_) => error_code::PERMISSION_DENIED,
            ConsoleError::Business { .. } => error_code::BUSINESS_ERROR,
            ConsoleError::Decode(_) => error_code::DECODE_ERROR,
            ConsoleError::Storage(_) => error_code::STORAGE_ERROR,
            ConsoleError::Config(_) => error_code::CONFIG_ERROR,
        }
    }

    /// Classify a non-success HTTP status.
    ///
    /// 401 and 403 get their own variants, 5xx is a server error,
    /// anything else is a client error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => ConsoleError::Unauthorized(message),
            403 => ConsoleError::PermissionDenied(message),
            500..=599 => ConsoleError::Server { status, message },
            _ => ConsoleError::Client { status, message },
        }
    }

    /// Whether a retry may succeed: network, timeout and 5xx only.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ConsoleError::Network(_) | ConsoleError::Timeout(_) | ConsoleError::Server { .. }
        )
    }

    /// Whether this error ends the session (forced logout + redirect).
    ///
    /// Some backend routes report an expired login inside the envelope
    /// (`{"code": 401}`) rather than through the HTTP status.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            ConsoleError::Unauthorized(_) | ConsoleError::Business { code: 401, .. }
        )
    }

    /// Whether this came from the transport rather than from the envelope
    /// or local state.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ConsoleError::Network(_)
                | ConsoleError::Timeout(_)
                | ConsoleError::Server { .. }
                | ConsoleError::Client { .. }
                | ConsoleError::Unauthorized(_)
                | ConsoleError::PermissionDenied(_)
        )
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(e: serde_json::Error) -> Self {
        ConsoleError::Decode(e.to_string())
    }
}

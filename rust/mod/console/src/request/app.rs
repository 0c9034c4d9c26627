//! App lifecycle requests.

use fmconsole_core::ConsoleError;

/// Restore the persisted session, or route to sign-in.
#[derive(Debug, Clone)]
pub struct InitializeReq;

impl InitializeReq {
    pub const PATH: &'static str = "app/initialize";
}

/// Clear `app/error`.
#[derive(Debug, Clone)]
pub struct DismissErrorReq;

impl DismissErrorReq {
    pub const PATH: &'static str = "app/dismiss-error";
}

/// Hand a failed backend call (e.g. from a `ResourceClient`) to the console.
///
/// An expired session signs out; anything else lands in `app/error`.
#[derive(Debug, Clone)]
pub struct ReportErrorReq {
    pub error: ConsoleError,
}

impl ReportErrorReq {
    pub const PATH: &'static str = "app/report-error";
}

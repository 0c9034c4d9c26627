//! App lifecycle handlers.

use chrono::Utc;
use fmconsole_flux::StateStore;
use fmconsole_nav::LOGIN_PATH;

use crate::context::ConsoleContext;
use crate::handlers::helpers;
use crate::request::ReportErrorReq;
use crate::state::*;

/// Handle `app/initialize`.
///
/// A persisted, unexpired session is reinstalled without asking the
/// backend; otherwise the app starts signed out on the login page.
pub async fn handle_initialize(store: &StateStore, ctx: &ConsoleContext) {
    store.set(OpenTabs::PATH, helpers::default_tabs(ctx));

    let restored = match ctx.sessions.restore(Utc::now()) {
        Ok(restored) => restored,
        Err(e) => {
            tracing::warn!(error = %e, "session storage unreadable");
            store.set(ErrorBanner::PATH, ErrorBanner::from(&e));
            None
        }
    };

    let Some(session) = restored else {
        store.set(AuthState::PATH, AuthState::signed_out(None));
        helpers::navigate(store, LOGIN_PATH);
        return;
    };

    ctx.next_epoch();
    match helpers::install_session(store, ctx, &session) {
        Ok(()) => {
            tracing::info!(account = session.account(), "session restored");
            helpers::navigate(store, &ctx.home_path);
        }
        Err(e) => {
            store.set(ErrorBanner::PATH, ErrorBanner::from(&e));
            helpers::tear_down(store, ctx, Some(e.to_string()));
        }
    }
}

/// Handle `app/dismiss-error`.
pub async fn handle_dismiss_error(store: &StateStore) {
    store.remove(ErrorBanner::PATH);
}

/// Handle `app/report-error`.
pub async fn handle_report_error(req: &ReportErrorReq, store: &StateStore, ctx: &ConsoleContext) {
    helpers::report(store, ctx, req.error.clone());
}

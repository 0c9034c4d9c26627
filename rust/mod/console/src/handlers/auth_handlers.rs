//! Auth handlers.

use chrono::Utc;
use fmconsole_auth::Session;
use fmconsole_core::{ConsoleError, PermissionSet};
use fmconsole_flux::StateStore;
use fmconsole_nav::LOGIN_PATH;

use crate::context::ConsoleContext;
use crate::handlers::helpers;
use crate::request::*;
use crate::state::*;

/// Handle `auth/login`.
pub async fn handle_login(req: &LoginReq, store: &StateStore, ctx: &ConsoleContext) {
    let epoch = ctx.next_epoch();
    store.set(AuthState::PATH, AuthState {
        phase: AuthPhase::Unauthenticated,
        user: None,
        busy: true,
        error: None,
    });

    let session = match sign_in(req, ctx, epoch).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            tracing::debug!(account = %req.account, "login superseded, discarding response");
            return;
        }
        Err(e) => {
            if !ctx.is_current(epoch) {
                return;
            }
            ctx.token.clear();
            tracing::warn!(account = %req.account, code = e.error_code(), error = %e, "login failed");
            store.set(AuthState::PATH, AuthState::signed_out(Some(e.to_string())));
            return;
        }
    };

    if let Err(e) = ctx.sessions.persist(&session) {
        tracing::warn!(error = %e, "session not persisted, it will not survive a reload");
    }
    match helpers::install_session(store, ctx, &session) {
        Ok(()) => helpers::navigate(store, &ctx.home_path),
        Err(e) => {
            store.set(ErrorBanner::PATH, ErrorBanner::from(&e));
            helpers::tear_down(store, ctx, Some(e.to_string()));
        }
    }
}

/// Credential, then permissions. `None` once `epoch` has been superseded.
async fn sign_in(
    req: &LoginReq,
    ctx: &ConsoleContext,
    epoch: u64,
) -> Result<Option<Session>, ConsoleError> {
    let token = ctx.api.login(&req.account, &req.password).await?;
    if !ctx.is_current(epoch) {
        return Ok(None);
    }
    let credential = ctx.sessions.open_credential(&token)?;
    if credential.is_expired(Utc::now()) {
        return Err(ConsoleError::Unauthorized("credential already expired".into()));
    }

    ctx.token.set(token);
    let permissions: PermissionSet = ctx.api.permissions().await?.into_iter().collect();
    if !ctx.is_current(epoch) {
        return Ok(None);
    }
    Ok(Some(Session::new(credential, permissions)))
}

/// Handle `auth/logout`.
pub async fn handle_logout(store: &StateStore, ctx: &ConsoleContext) {
    ctx.next_epoch();
    helpers::tear_down(store, ctx, None);
    tracing::info!("signed out");
}

/// Handle `auth/refresh-permissions`.
pub async fn handle_refresh_permissions(store: &StateStore, ctx: &ConsoleContext) {
    let epoch = ctx.epoch();
    let Some(token) = ctx.token.current() else {
        tracing::debug!("no session, nothing to refresh");
        return;
    };

    let result = ctx.api.permissions().await;
    if !ctx.is_current(epoch) {
        tracing::debug!("permissions response outlived its session, discarding");
        return;
    }
    let result = result.and_then(|list| {
        let credential = ctx.sessions.open_credential(&token)?;
        if credential.is_expired(Utc::now()) {
            return Err(ConsoleError::Unauthorized("credential expired".into()));
        }
        Ok(Session::new(credential, list.into_iter().collect()))
    });

    let session = match result {
        Ok(session) => session,
        Err(e) => return helpers::report(store, ctx, e),
    };
    if let Err(e) = ctx.sessions.persist(&session) {
        tracing::warn!(error = %e, "refreshed permissions not persisted");
    }
    if let Err(e) = helpers::install_session(store, ctx, &session) {
        return helpers::report(store, ctx, e);
    }

    // The current page may have been revoked.
    let current = store.get_as::<AppRoute>(AppRoute::PATH).map(|r| r.0);
    if let Some(path) = current {
        let routes = store.get_as::<RouteTree>(RouteTree::PATH).unwrap_or_default();
        let reachable = path == LOGIN_PATH
            || matches!(
                routes.0.resolve(&path, &session.permissions),
                fmconsole_nav::Resolution::Page(_)
            );
        if !reachable {
            tracing::info!(path = %path, "current page no longer permitted");
            helpers::navigate(store, &ctx.home_path);
        }
    }
}

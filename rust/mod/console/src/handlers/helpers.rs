//! Shared helpers for handlers.

use fmconsole_auth::Session;
use fmconsole_core::{ConsoleError, PermissionSet};
use fmconsole_flux::StateStore;
use fmconsole_nav::{breadcrumb, TabChange, TabState, LOGIN_PATH};

use crate::context::ConsoleContext;
use crate::state::*;

/// Fresh tab bar holding only the home tab.
pub fn default_tabs(ctx: &ConsoleContext) -> OpenTabs {
    OpenTabs(TabState::new(&ctx.home_path, &ctx.home_label()))
}

/// Permissions of the current session, empty when signed out.
pub fn held(store: &StateStore) -> PermissionSet {
    store
        .get_as::<SessionPermissions>(SessionPermissions::PATH)
        .map(|p| p.0)
        .unwrap_or_default()
}

pub fn is_authenticated(store: &StateStore) -> bool {
    store
        .get_as::<AuthState>(AuthState::PATH)
        .map(|a| a.is_authenticated())
        .unwrap_or(false)
}

/// Move to `path` and refresh the breadcrumb.
pub fn navigate(store: &StateStore, path: &str) {
    let menu = store
        .get_as::<SidebarMenu>(SidebarMenu::PATH)
        .unwrap_or_default();
    store.set(Breadcrumbs::PATH, Breadcrumbs(breadcrumb(&menu.0, path)));
    store.set(AppRoute::PATH, AppRoute(path.to_string()));
}

/// Follow a tab operation's navigation, if it has one.
pub fn apply_tab_change(store: &StateStore, change: TabChange) {
    if let Some(path) = change.navigate_to {
        navigate(store, &path);
    }
}

/// Make `session` the active one: bearer token, permissions, routes, menu,
/// tabs and auth state. Auth state is written last so observers of
/// `auth/state` see navigation already in place.
pub fn install_session(
    store: &StateStore,
    ctx: &ConsoleContext,
    session: &Session,
) -> Result<(), ConsoleError> {
    let nav = ctx.catalog.navigation(&session.permissions, ctx.policy)?;
    ctx.token.set(session.credential.token());

    let tabs = store.update(
        OpenTabs::PATH,
        || default_tabs(ctx),
        |tabs| tabs.0.prune(&nav.routes),
    );
    tracing::info!(
        account = session.account(),
        permissions = session.permissions.len(),
        routes = nav.routes.len(),
        "session installed"
    );
    store.set(SessionPermissions::PATH, SessionPermissions(session.permissions.clone()));
    store.set(RouteTree::PATH, RouteTree(nav.routes));
    store.set(SidebarMenu::PATH, SidebarMenu(nav.menu));
    store.set(AuthState::PATH, AuthState::signed_in(UserProfile::from(session)));
    apply_tab_change(store, tabs);
    Ok(())
}

/// Drop the session everywhere and route to sign-in.
pub fn tear_down(store: &StateStore, ctx: &ConsoleContext, error: Option<String>) {
    if let Err(e) = ctx.sessions.clear() {
        tracing::warn!(error = %e, "failed to clear stored session");
    }
    ctx.token.clear();

    store.set(SessionPermissions::PATH, SessionPermissions::default());
    store.set(RouteTree::PATH, RouteTree::default());
    store.set(SidebarMenu::PATH, SidebarMenu::default());
    store.set(OpenTabs::PATH, default_tabs(ctx));
    store.set(AuthState::PATH, AuthState::signed_out(error));
    navigate(store, LOGIN_PATH);
}

/// Route a failed request: an expired session signs out, anything else
/// lands in `app/error`.
pub fn report(store: &StateStore, ctx: &ConsoleContext, err: ConsoleError) {
    if err.is_auth_expired() {
        tracing::warn!(error = %err, "session expired, signing out");
        ctx.next_epoch();
        tear_down(store, ctx, Some("Session expired, please sign in again".into()));
        return;
    }
    tracing::warn!(code = err.error_code(), error = %err, "request failed");
    store.set(ErrorBanner::PATH, ErrorBanner::from(&err));
}

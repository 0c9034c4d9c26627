//! Navigation and tab handlers.

use fmconsole_core::ConsoleError;
use fmconsole_flux::StateStore;
use fmconsole_nav::{find, Resolution, TabChange, TabState, LOGIN_PATH};

use crate::context::ConsoleContext;
use crate::handlers::helpers;
use crate::request::*;
use crate::state::*;

/// Handle `nav/menu-click`.
pub async fn handle_menu_click(req: &MenuClickReq, store: &StateStore, ctx: &ConsoleContext) {
    let routes = store.get_as::<RouteTree>(RouteTree::PATH).unwrap_or_default();
    let held = helpers::held(store);

    match routes.0.resolve(&req.path, &held) {
        Resolution::Page(page) => {
            let menu = store.get_as::<SidebarMenu>(SidebarMenu::PATH).unwrap_or_default();
            let label = find(&menu.0, &req.path)
                .map(|n| n.label.clone())
                .or_else(|| routes.0.get(&req.path).map(|r| r.label.clone()))
                .unwrap_or_else(|| req.path.clone());
            tracing::debug!(path = %req.path, %page, "menu click");
            update_tabs(store, ctx, |tabs| tabs.open(&req.path, &label));
            helpers::navigate(store, &req.path);
        }
        Resolution::Public => helpers::navigate(store, LOGIN_PATH),
        Resolution::Forbidden | Resolution::Unauthorized => helpers::report(
            store,
            ctx,
            ConsoleError::PermissionDenied(format!("{} is not permitted", req.path)),
        ),
        Resolution::NotFound => {
            tracing::warn!(path = %req.path, "menu entry has no route");
        }
    }
}

/// Handle `nav/location`.
pub async fn handle_location(req: &LocationReq, store: &StateStore, ctx: &ConsoleContext) {
    if !helpers::is_authenticated(store) {
        if req.path != LOGIN_PATH {
            tracing::debug!(path = %req.path, "signed out, redirecting to login");
        }
        helpers::navigate(store, LOGIN_PATH);
        return;
    }
    if req.path == LOGIN_PATH {
        helpers::navigate(store, &ctx.home_path);
        return;
    }

    let menu = store.get_as::<SidebarMenu>(SidebarMenu::PATH).unwrap_or_default();
    let change = update_tabs(store, ctx, |tabs| tabs.sync_location(&req.path, &menu.0));
    let target = change.navigate_to.unwrap_or_else(|| req.path.clone());

    let routes = store.get_as::<RouteTree>(RouteTree::PATH).unwrap_or_default();
    if target != ctx.home_path
        && routes.0.resolve(&target, &helpers::held(store)) == Resolution::Forbidden
    {
        helpers::report(
            store,
            ctx,
            ConsoleError::PermissionDenied(format!("{} is not permitted", target)),
        );
        update_tabs(store, ctx, |tabs| {
            tabs.close(&target);
            tabs.select(&ctx.home_path)
        });
        helpers::navigate(store, &ctx.home_path);
        return;
    }
    helpers::navigate(store, &target);
}

/// Handle `tabs/select`.
pub async fn handle_select_tab(req: &SelectTabReq, store: &StateStore, ctx: &ConsoleContext) {
    let change = update_tabs(store, ctx, |tabs| tabs.select(&req.key));
    helpers::apply_tab_change(store, change);
}

/// Handle `tabs/close`.
pub async fn handle_close_tab(req: &CloseTabReq, store: &StateStore, ctx: &ConsoleContext) {
    let change = update_tabs(store, ctx, |tabs| tabs.close(&req.key));
    helpers::apply_tab_change(store, change);
}

/// Handle `tabs/close-others`.
pub async fn handle_close_other_tabs(
    req: &CloseOtherTabsReq,
    store: &StateStore,
    ctx: &ConsoleContext,
) {
    let change = update_tabs(store, ctx, |tabs| tabs.close_others(&req.key));
    helpers::apply_tab_change(store, change);
}

/// Handle `tabs/close-all`.
pub async fn handle_close_all_tabs(store: &StateStore, ctx: &ConsoleContext) {
    let change = update_tabs(store, ctx, |tabs| tabs.close_all());
    helpers::apply_tab_change(store, change);
}

fn update_tabs(
    store: &StateStore,
    ctx: &ConsoleContext,
    f: impl FnOnce(&mut TabState) -> TabChange,
) -> TabChange {
    store.update(OpenTabs::PATH, || helpers::default_tabs(ctx), |tabs| f(&mut tabs.0))
}

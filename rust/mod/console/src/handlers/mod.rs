//! Request handlers and their Flux wiring.

pub mod app_handlers;
pub mod auth_handlers;
pub mod helpers;
pub mod nav_handlers;

use std::any::Any;
use std::sync::Arc;

use fmconsole_flux::{Flux, Payload, StateStore};

use crate::context::ConsoleContext;
use crate::request::*;

/// Register every console request with `flux`.
///
/// Each registration downcasts the payload to the request type and hands
/// it, the store and the shared context to the handler.
pub fn register_handlers(flux: &Flux, ctx: Arc<ConsoleContext>) {
    // app/initialize
    {
        let ctx = ctx.clone();
        flux.on(InitializeReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                app_handlers::handle_initialize(&store, &ctx).await;
            }
        });
    }

    // app/dismiss-error
    flux.on(DismissErrorReq::PATH, |_, _, store: Arc<StateStore>| async move {
        app_handlers::handle_dismiss_error(&store).await;
    });

    // app/report-error
    {
        let ctx = ctx.clone();
        flux.on(ReportErrorReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = request::<ReportErrorReq>(&path, &payload) {
                    app_handlers::handle_report_error(req, &store, &ctx).await;
                }
            }
        });
    }

    // auth/login
    {
        let ctx = ctx.clone();
        flux.on(LoginReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = request::<LoginReq>(&path, &payload) {
                    auth_handlers::handle_login(req, &store, &ctx).await;
                }
            }
        });
    }

    // auth/logout
    {
        let ctx = ctx.clone();
        flux.on(LogoutReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                auth_handlers::handle_logout(&store, &ctx).await;
            }
        });
    }

    // auth/refresh-permissions
    {
        let ctx = ctx.clone();
        flux.on(RefreshPermissionsReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                auth_handlers::handle_refresh_permissions(&store, &ctx).await;
            }
        });
    }

    // nav/menu-click
    {
        let ctx = ctx.clone();
        flux.on(MenuClickReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = request::<MenuClickReq>(&path, &payload) {
                    nav_handlers::handle_menu_click(req, &store, &ctx).await;
                }
            }
        });
    }

    // nav/location
    {
        let ctx = ctx.clone();
        flux.on(LocationReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = request::<LocationReq>(&path, &payload) {
                    nav_handlers::handle_location(req, &store, &ctx).await;
                }
            }
        });
    }

    // tabs/select
    {
        let ctx = ctx.clone();
        flux.on(SelectTabReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = request::<SelectTabReq>(&path, &payload) {
                    nav_handlers::handle_select_tab(req, &store, &ctx).await;
                }
            }
        });
    }

    // tabs/close
    {
        let ctx = ctx.clone();
        flux.on(CloseTabReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = request::<CloseTabReq>(&path, &payload) {
                    nav_handlers::handle_close_tab(req, &store, &ctx).await;
                }
            }
        });
    }

    // tabs/close-others
    {
        let ctx = ctx.clone();
        flux.on(CloseOtherTabsReq::PATH, move |path, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = request::<CloseOtherTabsReq>(&path, &payload) {
                    nav_handlers::handle_close_other_tabs(req, &store, &ctx).await;
                }
            }
        });
    }

    // tabs/close-all
    flux.on(CloseAllTabsReq::PATH, move |_, _, store: Arc<StateStore>| {
        let ctx = ctx.clone();
        async move {
            nav_handlers::handle_close_all_tabs(&store, &ctx).await;
        }
    });
}

/// Typed view of a request payload. Logs and yields `None` on a mismatch.
fn request<'a, T: Any>(path: &str, payload: &'a Payload) -> Option<&'a T> {
    let req = payload.downcast_ref::<T>();
    if req.is_none() {
        tracing::warn!(path, expected = std::any::type_name::<T>(), "unexpected payload type");
    }
    req
}

//! Facility-management console core.
//!
//! Wires session, HTTP client and navigation into one Flux store:
//!
//! ```ignore
//! let config = ConsoleConfig::from_args(&args).with_env();
//! let (flux, ctx) = fmconsole_app::build(&config)?;
//! flux.emit(InitializeReq::PATH, InitializeReq).await;
//! flux.emit(MenuClickReq::PATH, MenuClickReq { path: "/auth/users".into() }).await;
//! let route = flux.get_as::<AppRoute>(AppRoute::PATH);
//! ```

pub mod context;
pub mod handlers;
pub mod request;
pub mod state;

use std::sync::Arc;

use fmconsole_core::{ConsoleConfig, ConsoleError};
use fmconsole_flux::Flux;

pub use context::ConsoleContext;
pub use handlers::register_handlers;

/// HTTP-backed console with every handler registered.
pub fn build(config: &ConsoleConfig) -> Result<(Flux, Arc<ConsoleContext>), ConsoleError> {
    let ctx = Arc::new(ConsoleContext::from_config(config)?);
    let flux = Flux::new();
    register_handlers(&flux, ctx.clone());
    tracing::info!(api = %config.api_base, home = %config.home_path, "console ready");
    Ok((flux, ctx))
}

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// For embedding applications; a second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

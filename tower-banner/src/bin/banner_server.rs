use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use shot_banner::BannerSelector;
use shot_banner::Inventory;
use tower::BoxError;
use tower::Layer;
use tower_banner::BannerRequest;
use tower_banner::BannerService;
use tower_banner::ManagedBannerLayer;
use tower_banner::config::ServerArgs;
use tower_banner::config::init_logging;
use tower_banner::http::router;
use tracing::error;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = ServerArgs::parse();
    init_logging(&args.log_level);
    info!(?args, "banner server starting");

    // 1. Load the inventory; nothing is served from a partial one
    let inventory = Inventory::from_path(&args.config).inspect_err(|err| {
        error!(config = %args.config.display(), %err, "failed to load banner configuration");
    })?;
    info!(
        banners = inventory.len(),
        categories = inventory.categories().count(),
        "inventory loaded"
    );

    // 2. Build the selector and the managed service stack
    let selector =
        Arc::new(BannerSelector::new(Arc::new(inventory)).with_max_attempts(args.max_attempts));
    let stack = ManagedBannerLayer::<BannerRequest>::new(args.timeout, args.concurrency)
        .layer(BannerService::new(selector));

    // 3. Serve
    let listener = tokio::net::TcpListener::bind(args.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        router(stack).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

use std::net::SocketAddr;

use axum::Router;
use axum::extract::ConnectInfo;
use axum::extract::RawQuery;
use axum::extract::State;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use tower::BoxError;
use tower::ServiceExt;
use tower::util::BoxCloneSyncService;

use crate::BannerError;
use crate::BannerRequest;
use crate::Placement;

/// The service stack a router dispatches banner requests to.
pub type BannerStack = BoxCloneSyncService<BannerRequest, Placement, BoxError>;

/// Builds the HTTP surface: `GET /` serves a banner, `GET /health` answers `ok`.
///
/// The client identity comes from [`ConnectInfo`], so serve the router with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn router(stack: BannerStack) -> Router {
    Router::new()
        .route("/", get(serve_banner))
        .route("/health", get(|| async { "ok" }))
        .with_state(stack)
}

async fn serve_banner(
    State(stack): State<BannerStack>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    RawQuery(query): RawQuery,
) -> Response {
    let req = BannerRequest::from_query(query.as_deref(), BannerRequest::client_id(peer.ip()));

    match stack.oneshot(req).await {
        Ok(placement) => Html(placement.html).into_response(),
        Err(err) => BannerError::from_boxed(err).into_response(),
    }
}

//! # Tower Banner
//!
//! `tower-banner` puts a [`shot_banner::BannerSelector`] behind a
//! [Tower](https://github.com/tower-rs/tower) service and an axum router.
//!
//! ## The Request Path
//!
//! 1. **Decoding**: [`BannerRequest::from_query`] collects the `category[]` filters
//!    and the client identity (the peer IP).
//! 2. **Selection**: [`BannerService`] runs the selector and renders the chosen
//!    banner into a [`Placement`]. The selection itself never suspends.
//! 3. **Lifecycle**: [`ManagedBannerLayer`] adds a concurrency limit with load
//!    shedding and maps every failure into [`BannerError`]. Its timeout bounds
//!    asynchronous inner services only, since selection finishes inside `call`.
//!
//! ## Feature Flags
//!
//! - `axum` (default): Enables the [`http::router`] and `IntoResponse` for
//!   [`BannerError`] (404, 408, 503, 500).

pub mod config;
mod error;
#[cfg(feature = "axum")]
pub mod http;
mod managed_layer;
mod render;
mod request;
mod service;


pub use error::BannerError;
pub use managed_layer::ManagedBannerLayer;
pub use render::ALT_TEXT;
pub use render::render;
pub use request::BannerRequest;
pub use request::CATEGORY_PARAM;
pub use service::BannerService;
pub use service::Placement;

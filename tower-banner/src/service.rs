use std::ops::ControlFlow;
use std::sync::Arc;
use std::task::Context;
use std::task::Poll;

use futures::future::Ready;
use futures::future::ready;
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::metrics::Counter;
use shot_banner::BannerSelector;
use shot_banner::Picker;
use shot_banner::UniformPicker;
use tower::BoxError;
use tower::Service;
use tracing::debug;

use crate::error::BannerError;
use crate::render::render;
use crate::request::BannerRequest;

/// A banner chosen for a request, with its rendered form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub banner: Arc<str>,
    pub html: String,
}

#[derive(Clone, Debug)]
struct BannerServiceMetrics {
    served: Counter<u64>,
    not_found: Counter<u64>,
}

/// Serves banners from a shared [`BannerSelector`].
///
/// Selection is in-memory and never waits, so the service is always ready and
/// its future resolves immediately. Clones share the same selector.
#[derive(Debug)]
pub struct BannerService<P = UniformPicker> {
    selector: Arc<BannerSelector<P>>,
    instruments: BannerServiceMetrics,
}

impl<P> Clone for BannerService<P> {
    fn clone(&self) -> Self {
        Self {
            selector: Arc::clone(&self.selector),
            instruments: self.instruments.clone(),
        }
    }
}

impl<P> Service<BannerRequest> for BannerService<P>
where
    P: Picker,
{
    type Response = Placement;
    type Error = BoxError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BannerRequest) -> Self::Future {
        ready(self.place(&req))
    }
}

impl<P> BannerService<P>
where
    P: Picker,
{
    pub fn new(selector: Arc<BannerSelector<P>>) -> Self {
        let meter = global::meter("banner_service");
        let instruments = BannerServiceMetrics {
            served: meter.u64_counter("banner_served").build(),
            not_found: meter.u64_counter("banner_not_found").build(),
        };

        Self {
            selector,
            instruments,
        }
    }

    pub fn selector(&self) -> &BannerSelector<P> {
        &self.selector
    }

    fn place(&self, req: &BannerRequest) -> Result<Placement, BoxError> {
        match self.selector.select(req.categories.as_slice(), &req.client) {
            ControlFlow::Continue(banner) => {
                self.instruments.served.add(1, &[]);
                Ok(Placement {
                    html: render(&banner),
                    banner,
                })
            }
            ControlFlow::Break(reason) => {
                debug!(client = %req.client, categories = ?req.categories, reason = reason.as_str(), "banner not found");
                self.instruments
                    .not_found
                    .add(1, &[KeyValue::new("reason", reason.as_str())]);
                Err(Box::new(BannerError::NotFound(reason)))
            }
        }
    }
}

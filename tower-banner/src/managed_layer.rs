use std::marker::PhantomData;
use std::time::Duration;

use tower::BoxError;
use tower::Layer;
use tower::Service;
use tower::util::BoxCloneSyncService;

use crate::BannerError;
#[cfg(doc)]
use crate::BannerService;

/// A bounded, non-queuing request lifecycle around a banner service.
///
/// This layer uses a "Shed-First" architecture. Requests beyond the concurrency
/// limit are rejected at once instead of piling up in memory.
///
/// ### Error Responsibilities:
/// - **LoadShedding (`BannerError::Overloaded`)**: The concurrency limit is
///   reached. This happens at the `poll_ready` stage and is near-instant.
/// - **Timeout (`BannerError::Timeout`)**: The inner service's future took longer
///   than `max_wait` to resolve. The deadline starts once `call` returns, so it
///   only bounds services that do their work inside the future. [`BannerService`]
///   selects inside `call` and is never timed out.
/// - **Not found (`BannerError::NotFound`)**: Passed through unchanged.
///
/// Every other inner error becomes `BannerError::Inner`.
pub struct ManagedBannerLayer<Req> {
    max_wait: Duration,
    concurrency: usize,
    _phantom: PhantomData<fn(Req)>,
}

// A derived Clone would require `Req: Clone`, which axum request types are not.
impl<Req> Clone for ManagedBannerLayer<Req> {
    fn clone(&self) -> Self {
        Self {
            max_wait: self.max_wait,
            concurrency: self.concurrency,
            _phantom: PhantomData,
        }
    }
}

impl<S, Req> Layer<S> for ManagedBannerLayer<Req>
where
    S: Service<Req, Error = BoxError> + Clone + Send + Sync + 'static,
    S::Future: Send + 'static,
    S::Response: 'static,
    Req: Send + 'static,
{
    type Service = BoxCloneSyncService<Req, S::Response, BoxError>;

    fn layer(&self, inner: S) -> Self::Service {
        // Timeout is outer to ensure a hard deadline on the entire process.
        let svc = tower::ServiceBuilder::new()
            .timeout(self.max_wait)
            .load_shed()
            .concurrency_limit(self.concurrency)
            .service(inner);

        // Map the mixed errors into BannerError
        let mapped_svc = tower::util::MapErr::new(svc, |err: BoxError| {
            BoxError::from(BannerError::from_boxed(err))
        });

        BoxCloneSyncService::new(mapped_svc)
    }
}

impl<Req> ManagedBannerLayer<Req> {
    /// `concurrency` is clamped to at least one in-flight request.
    pub fn new(max_wait: Duration, concurrency: usize) -> Self {
        Self {
            max_wait,
            concurrency: concurrency.max(1),
            _phantom: PhantomData,
        }
    }
}

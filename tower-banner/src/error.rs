use shot_banner::Reason;

/// Errors produced by the banner service stack.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BannerError {
    /// No banner is eligible for the request.
    ///
    /// When the `axum` feature is enabled, this converts to `404 Not Found`.
    #[error("Not found")]
    NotFound(Reason),

    /// The request exceeded the maximum allowed time.
    ///
    /// When the `axum` feature is enabled, this converts to `408 Request Timeout`.
    #[error("Request timed out")]
    Timeout,

    /// The service is at its concurrency limit and cannot take more requests.
    ///
    /// When the `axum` feature is enabled, this converts to `503 Service Unavailable`.
    #[error("Service is overloaded; request shed")]
    Overloaded,

    /// An unexpected error occurred in the inner service.
    ///
    /// The string contains the `Display` representation of the inner error.
    /// When the `axum` feature is enabled, this converts to `500 Internal Server Error`.
    #[error("Internal service error: {0}")]
    Inner(String),
}

impl BannerError {
    /// Maps any error from a banner service stack into the banner domain.
    pub fn from_boxed(err: tower::BoxError) -> Self {
        if let Some(banner_err) = err.downcast_ref::<BannerError>() {
            banner_err.clone()
        } else if err.is::<tower::timeout::error::Elapsed>() {
            BannerError::Timeout
        } else if err.is::<tower::load_shed::error::Overloaded>() {
            BannerError::Overloaded
        } else {
            BannerError::Inner(err.to_string())
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for BannerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            Self::Inner(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_tower_errors() {
        let err = BannerError::from_boxed(Box::new(tower::timeout::error::Elapsed::new()));
        assert!(matches!(err, BannerError::Timeout));

        let err = BannerError::from_boxed(Box::new(tower::load_shed::error::Overloaded::new()));
        assert!(matches!(err, BannerError::Overloaded));

        let err = BannerError::from_boxed(Box::new(BannerError::NotFound(Reason::Exhausted)));
        assert!(matches!(err, BannerError::NotFound(Reason::Exhausted)));

        let err = BannerError::from_boxed("boom".into());
        assert!(matches!(err, BannerError::Inner(msg) if msg == "boom"));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            BannerError::NotFound(Reason::UnknownCategories).to_string(),
            "Not found"
        );
    }
}

//! Location Source: one fix per explicit request, or a manual override.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::LocationError;
use crate::geo::Coordinate;

/// Host error codes, matching the W3C geolocation `PositionError` codes.
pub const PERMISSION_DENIED: u16 = 1;
pub const POSITION_UNAVAILABLE: u16 = 2;
pub const TIMEOUT: u16 = 3;

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest acceptable cached fix. Zero means a fresh fix is required.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Failure reported by the host location primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    pub code: u16,
    pub message: String,
}

impl HostError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<HostError> for LocationError {
    fn from(err: HostError) -> Self {
        match err.code {
            PERMISSION_DENIED => LocationError::PermissionDenied,
            POSITION_UNAVAILABLE => LocationError::PositionUnavailable,
            TIMEOUT => LocationError::Timeout,
            _ if err.message.is_empty() => {
                LocationError::Unknown("Unknown error acquiring position".to_string())
            }
            _ => LocationError::Unknown(err.message),
        }
    }
}

/// A host capability able to produce one position fix per request.
///
/// Each call completes exactly once and cannot be cancelled by the caller.
pub trait PositionProvider {
    fn request_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<Coordinate, HostError>> + Send;
}

/// Provider with a single canned outcome. Counts requests.
#[derive(Debug)]
pub struct FixedProvider {
    outcome: Result<Coordinate, HostError>,
    requests: AtomicUsize,
}

impl FixedProvider {
    pub fn fix(coordinate: Coordinate) -> Self {
        Self {
            outcome: Ok(coordinate),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn failing(code: u16, message: impl Into<String>) -> Self {
        Self {
            outcome: Err(HostError::new(code, message)),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl PositionProvider for FixedProvider {
    async fn request_position(&self, _options: PositionOptions) -> Result<Coordinate, HostError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

pub struct LocationSource<P> {
    provider: Option<P>,
    options: PositionOptions,
}

impl<P: PositionProvider> LocationSource<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Some(provider),
            options: PositionOptions::default(),
        }
    }

    /// A source on a host with no location capability.
    pub fn unsupported() -> Self {
        Self {
            provider: None,
            options: PositionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> PositionOptions {
        self.options
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Request one fresh fix. No internal retry.
    pub async fn acquire_current_position(&self) -> Result<Coordinate, LocationError> {
        let Some(provider) = &self.provider else {
            warn!("No location capability available");
            return Err(LocationError::CapabilityMissing);
        };

        match provider.request_position(self.options).await {
            Ok(coordinate) => {
                debug!("Position fix: {}, {}", coordinate.lat, coordinate.lng);
                Ok(coordinate)
            }
            Err(host) => {
                warn!("Position request failed (code {}): {}", host.code, host.message);
                Err(host.into())
            }
        }
    }

    /// Accept a caller-supplied coordinate as if it were a fix.
    ///
    /// Out-of-range or non-finite values are rejected.
    pub fn set_manual_position(&self, coordinate: Coordinate) -> Result<Coordinate, LocationError> {
        if !coordinate.is_in_range() {
            return Err(LocationError::InvalidInput(format!(
                "latitude {} / longitude {} out of range",
                coordinate.lat, coordinate.lng
            )));
        }
        debug!("Manual position: {}, {}", coordinate.lat, coordinate.lng);
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocationErrorKind;

    fn kathmandu() -> Coordinate {
        Coordinate::new(27.704, 85.307)
    }

    #[tokio::test]
    async fn test_missing_capability_fails_without_request() {
        let source = LocationSource::<FixedProvider>::unsupported();
        let err = source.acquire_current_position().await.unwrap_err();
        assert_eq!(err, LocationError::CapabilityMissing);
        assert_eq!(err.kind(), LocationErrorKind::CapabilityMissing);
    }

    #[tokio::test]
    async fn test_successful_fix_issues_one_request() {
        let source = LocationSource::new(FixedProvider::fix(kathmandu()));
        assert_eq!(source.acquire_current_position().await.unwrap(), kathmandu());
        assert_eq!(source.provider().unwrap().requests(), 1);
    }

    #[tokio::test]
    async fn test_host_codes_map_to_taxonomy() {
        let cases = [
            (1, LocationErrorKind::PermissionDenied),
            (2, LocationErrorKind::PositionUnavailable),
            (3, LocationErrorKind::Timeout),
            (0, LocationErrorKind::Unknown),
            (42, LocationErrorKind::Unknown),
        ];
        for (code, kind) in cases {
            let source = LocationSource::new(FixedProvider::failing(code, "sensor offline"));
            let err = source.acquire_current_position().await.unwrap_err();
            assert_eq!(err.kind(), kind, "code {code}");
            // Failures are not retried.
            assert_eq!(source.provider().unwrap().requests(), 1);
        }
    }

    #[tokio::test]
    async fn test_unknown_code_includes_message() {
        let source = LocationSource::new(FixedProvider::failing(7, "sensor offline"));
        let err = source.acquire_current_position().await.unwrap_err();
        assert_eq!(err, LocationError::Unknown("sensor offline".into()));
        assert!(err.to_string().contains("sensor offline"));

        let source = LocationSource::new(FixedProvider::failing(7, ""));
        let err = source.acquire_current_position().await.unwrap_err();
        assert!(err.to_string().contains("Unknown error acquiring position"));
    }

    #[test]
    fn test_default_options() {
        let opts = PositionOptions::default();
        assert!(opts.high_accuracy);
        assert_eq!(opts.timeout, Duration::from_secs(10));
        assert_eq!(opts.maximum_age, Duration::ZERO);
    }

    #[test]
    fn test_manual_position_bypasses_provider() {
        let source = LocationSource::new(FixedProvider::failing(1, "denied"));
        assert_eq!(source.set_manual_position(kathmandu()).unwrap(), kathmandu());
        assert_eq!(source.provider().unwrap().requests(), 0);
    }

    #[test]
    fn test_manual_position_rejects_out_of_range() {
        let source = LocationSource::<FixedProvider>::unsupported();
        let err = source.set_manual_position(Coordinate::new(91.0, 0.0)).unwrap_err();
        assert_eq!(err.kind(), LocationErrorKind::InvalidInput);
        assert!(source.set_manual_position(Coordinate::new(0.0, 181.0)).is_err());
    }
}

//! Current position
//!
//! `PositionSource` turns a device sensor into one awaitable call with a
//! timeout, cached-fix reuse and a closed error taxonomy. Hosts without a
//! sensor build an unsupported source and get `LocationError::Unsupported`.

pub mod ip;

use crate::config::PositionConfig;
use crate::coord::Coordinate;
use crate::error::LocationError;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

pub use ip::IpSensor;

/// Options for a position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask the sensor for its best fix
    pub high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// Reuse a previous fix younger than this
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from(&PositionConfig::default())
    }
}

impl From<&PositionConfig> for PositionOptions {
    fn from(config: &PositionConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_secs(config.timeout_secs),
            maximum_age: Duration::from_secs(config.maximum_age_secs),
        }
    }
}

/// Trait for position sensors (GNSS, IP lookup, ...)
pub trait PositionSensor: Send + Sync {
    /// Take one fix
    fn read(
        &self,
        high_accuracy: bool,
    ) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

/// Single-shot current-position service
pub struct PositionSource<S> {
    sensor: Option<S>,
    options: PositionOptions,
    last_fix: Mutex<Option<(Instant, Coordinate)>>,
}

impl<S: PositionSensor> PositionSource<S> {
    pub fn new(sensor: S, options: PositionOptions) -> Self {
        Self {
            sensor: Some(sensor),
            options,
            last_fix: Mutex::new(None),
        }
    }

    /// A source for hosts without any position capability
    pub fn unsupported(options: PositionOptions) -> Self {
        Self {
            sensor: None,
            options,
            last_fix: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Get the current position
    ///
    /// Returns a cached fix when one is younger than `maximum_age`, otherwise
    /// reads the sensor for at most `timeout`.
    pub async fn current_position(&self) -> Result<Coordinate, LocationError> {
        let Some(sensor) = &self.sensor else {
            return Err(LocationError::Unsupported);
        };

        if let Some(fix) = self.cached_fix() {
            debug!(lat = fix.latitude, lng = fix.longitude, "using cached position");
            return Ok(fix);
        }

        let fix = match tokio::time::timeout(
            self.options.timeout,
            sensor.read(self.options.high_accuracy),
        )
        .await
        {
            Ok(Ok(fix)) => fix,
            Ok(Err(e)) => {
                warn!(error = %e, "position sensor failed");
                return Err(e);
            }
            Err(_) => {
                warn!(timeout = ?self.options.timeout, "position request timed out");
                return Err(LocationError::Timeout);
            }
        };

        if let Err(e) = fix.validate() {
            warn!(error = %e, "position sensor returned an invalid fix");
            return Err(LocationError::PositionUnavailable);
        }

        *self.last_fix.lock().unwrap_or_else(|e| e.into_inner()) = Some((Instant::now(), fix));
        Ok(fix)
    }

    fn cached_fix(&self) -> Option<Coordinate> {
        let guard = self.last_fix.lock().unwrap_or_else(|e| e.into_inner());
        let (taken_at, fix) = (*guard)?;
        (taken_at.elapsed() <= self.options.maximum_age && !self.options.maximum_age.is_zero())
            .then_some(fix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeSensor {
        outcome: Result<Coordinate, LocationError>,
        latency: Duration,
        reads: Arc<AtomicUsize>,
    }

    impl FakeSensor {
        fn ok(latency: Duration) -> Self {
            Self {
                outcome: Ok(Coordinate::new(9.5092, -13.7122).with_accuracy(20.0)),
                latency,
                reads: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn err(kind: LocationError) -> Self {
            Self {
                outcome: Err(kind),
                latency: Duration::ZERO,
                reads: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl PositionSensor for FakeSensor {
        async fn read(&self, _high_accuracy: bool) -> Result<Coordinate, LocationError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.outcome
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_sensor_fix() {
        let source = PositionSource::new(FakeSensor::ok(Duration::from_secs(1)), Default::default());
        let fix = source.current_position().await.unwrap();
        assert_eq!(fix.latitude, 9.5092);
        assert_eq!(fix.accuracy, Some(20.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_ten_seconds() {
        let source = PositionSource::new(FakeSensor::ok(Duration::from_secs(11)), Default::default());
        assert_eq!(source.current_position().await, Err(LocationError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_fix_reused_within_maximum_age() {
        let sensor = FakeSensor::ok(Duration::ZERO);
        let reads = Arc::clone(&sensor.reads);
        let source = PositionSource::new(sensor, Default::default());

        source.current_position().await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        source.current_position().await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        source.current_position().await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_maximum_age_always_reads() {
        let sensor = FakeSensor::ok(Duration::ZERO);
        let reads = Arc::clone(&sensor.reads);
        let options = PositionOptions {
            maximum_age: Duration::ZERO,
            ..Default::default()
        };
        let source = PositionSource::new(sensor, options);

        source.current_position().await.unwrap();
        source.current_position().await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sensor_errors_pass_through() {
        for kind in [
            LocationError::PermissionDenied,
            LocationError::PositionUnavailable,
            LocationError::Unknown,
        ] {
            let source = PositionSource::new(FakeSensor::err(kind), Default::default());
            assert_eq!(source.current_position().await, Err(kind));
        }
    }

    #[tokio::test]
    async fn test_unsupported_without_sensor() {
        let source: PositionSource<FakeSensor> = PositionSource::unsupported(Default::default());
        assert_eq!(
            source.current_position().await,
            Err(LocationError::Unsupported)
        );
    }

    #[tokio::test]
    async fn test_invalid_fix_is_unavailable() {
        let sensor = FakeSensor {
            outcome: Ok(Coordinate::new(f64::NAN, 0.0)),
            latency: Duration::ZERO,
            reads: Arc::new(AtomicUsize::new(0)),
        };
        let source = PositionSource::new(sensor, Default::default());
        assert_eq!(
            source.current_position().await,
            Err(LocationError::PositionUnavailable)
        );
    }

    #[test]
    fn test_default_options() {
        let options = PositionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(300));
    }
}

//! Single-shot position sampling.
//!
//! A [`PositionSource`] answers one request for the current position. The
//! [`GeoSampler`] wraps a source with the request policy (high accuracy, an
//! eight second timeout, no cached fixes) and turns every failure into
//! `None` plus a notification, so callers only ever see "a position" or
//! "no position". Late results are never cancelled here; callers that stop
//! caring simply discard them.

use crate::commands::CmdMessage;
use crate::error::{DiaryError, Result};
use crate::model::Location;
use crate::notify::SharedNotifier;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const SAMPLE_TIMEOUT: Duration = Duration::from_millis(8000);

pub const MSG_UNAVAILABLE: &str = "Location is not available on this device";
pub const MSG_FAILED: &str = "Could not get your location";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    /// Horizontal accuracy in meters, when the source reports one.
    pub acc: Option<f64>,
}

impl From<Position> for Location {
    fn from(pos: Position) -> Self {
        Location {
            lat: pos.lat,
            lng: pos.lng,
            acc: pos.acc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest acceptable cached fix. Zero demands a fresh one.
    pub maximum_age: Duration,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: SAMPLE_TIMEOUT,
            maximum_age: Duration::ZERO,
        }
    }
}

/// Something that can be asked where we are.
///
/// Implementations return [`DiaryError::GeolocationUnavailable`] when the
/// capability is absent altogether and [`DiaryError::GeolocationFailed`] for
/// anything else (permission, no fix, protocol trouble).
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self, options: &SampleOptions) -> Result<Position>;
}

/// The capability is missing entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSource;

#[async_trait]
impl PositionSource for NoSource {
    async fn current_position(&self, _options: &SampleOptions) -> Result<Position> {
        Err(DiaryError::GeolocationUnavailable)
    }
}

/// Always reports the same position, e.g. one typed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub Position);

#[async_trait]
impl PositionSource for FixedSource {
    async fn current_position(&self, _options: &SampleOptions) -> Result<Position> {
        Ok(self.0)
    }
}

#[derive(Clone)]
pub struct GeoSampler {
    source: Arc<dyn PositionSource>,
    notifier: SharedNotifier,
    options: SampleOptions,
}

impl GeoSampler {
    pub fn new(source: Arc<dyn PositionSource>, notifier: SharedNotifier) -> Self {
        Self {
            source,
            notifier,
            options: SampleOptions::default(),
        }
    }

    /// Ask for the current position once. Never fails: any problem is
    /// reported through the notifier and comes back as `None`.
    pub async fn sample(&self) -> Option<Position> {
        let request = self.source.current_position(&self.options);
        let outcome = match tokio::time::timeout(self.options.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(DiaryError::GeolocationFailed(format!(
                "timed out after {} ms",
                self.options.timeout.as_millis()
            ))),
        };

        match outcome {
            Ok(position) => {
                debug!(lat = position.lat, lng = position.lng, acc = ?position.acc, "position sampled");
                Some(position)
            }
            Err(DiaryError::GeolocationUnavailable) => {
                debug!("position source unavailable");
                self.notifier.notify(CmdMessage::warning(MSG_UNAVAILABLE));
                None
            }
            Err(e) => {
                debug!(error = %e, "position sample failed");
                self.notifier.notify(CmdMessage::warning(MSG_FAILED));
                None
            }
        }
    }
}

//! # Trail Recorder
//!
//! A two-state machine: `Idle` and `Recording`.
//!
//! ```text
//!            start (samples once, spawns ticker)
//!   Idle ───────────────────────────────────────▶ Recording
//!    ▲                                               │  every 20s: ticker samples,
//!    │         stop (aborts ticker, finalizes)       │  sends over the channel,
//!    └───────────────────────────────────────────────┘  apply() appends the point
//! ```
//!
//! While recording, a spawned task owns the periodic sampling. It does not
//! touch the trail: it sends each successful sample, tagged with the
//! recording's session id, over a channel. The recorder's owner pulls samples
//! with [`TrailRecorder::next_sample`] and hands them to
//! [`TrailRecorder::apply`]. A sample whose session is no longer the active
//! one (because `stop` ran while it was in flight) is dropped, so a finalized
//! trail is never mutated.
//!
//! The ticker handle is aborted exactly once: on `stop`, on `abandon`, or when
//! the recorder is dropped mid-recording.

use crate::error::{DiaryError, Result};
use crate::geo::GeoSampler;
use crate::model::{now_millis, Trail, TrailPoint};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const SAMPLE_PERIOD: Duration = Duration::from_secs(20);

/// One position sample destined for a specific recording session.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    session: String,
    pub point: TrailPoint,
}

/// Owned handle to the periodic sampling task.
struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(
        sampler: GeoSampler,
        period: Duration,
        session: String,
        tx: UnboundedSender<Sample>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            // The start sample was already taken; the first tick is one period out.
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(position) = sampler.sample().await else {
                    continue;
                };
                let sample = Sample {
                    session: session.clone(),
                    point: TrailPoint {
                        lat: position.lat,
                        lng: position.lng,
                        ts: now_millis(),
                    },
                };
                if tx.send(sample).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct Recording {
    trail: Trail,
    samples: UnboundedReceiver<Sample>,
    _ticker: Ticker,
}

pub struct TrailRecorder {
    period: Duration,
    active: Option<Recording>,
}

impl Default for TrailRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailRecorder {
    pub fn new() -> Self {
        Self::with_period(SAMPLE_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            active: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_trail(&self) -> Option<&Trail> {
        self.active.as_ref().map(|r| &r.trail)
    }

    /// Idle → Recording. Takes one sample right away, then leaves the rest to
    /// the ticker. Must be called from within a tokio runtime.
    pub async fn start(&mut self, sampler: &GeoSampler) -> Result<&Trail> {
        if self.is_recording() {
            return Err(DiaryError::Api("A trail is already being recorded".into()));
        }

        let mut trail = Trail::new(now_millis());
        if let Some(position) = sampler.sample().await {
            trail.push_point(TrailPoint {
                lat: position.lat,
                lng: position.lng,
                ts: now_millis(),
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(sampler.clone(), self.period, trail.id.clone(), tx);
        info!(trail = %trail.id, points = trail.points.len(), "recording started");

        let recording = self.active.insert(Recording {
            trail,
            samples: rx,
            _ticker: ticker,
        });
        Ok(&recording.trail)
    }

    /// Wait for the ticker's next successful sample. Returns `None` right away
    /// when idle.
    pub async fn next_sample(&mut self) -> Option<Sample> {
        match self.active.as_mut() {
            Some(recording) => recording.samples.recv().await,
            None => None,
        }
    }

    /// Append a sample to the active trail. Returns false, leaving everything
    /// untouched, when the sample belongs to a session that is no longer
    /// recording.
    pub fn apply(&mut self, sample: Sample) -> bool {
        match self.active.as_mut() {
            Some(recording) if recording.trail.id == sample.session => {
                recording.trail.push_point(sample.point);
                debug!(
                    trail = %recording.trail.id,
                    points = recording.trail.points.len(),
                    distance_m = recording.trail.distance_or_zero(),
                    "point appended"
                );
                true
            }
            _ => {
                debug!(session = %sample.session, "dropping sample from a finished recording");
                false
            }
        }
    }

    /// Recording → Idle. Cancels the ticker and returns the finalized trail.
    pub fn stop(&mut self) -> Option<Trail> {
        let Recording { mut trail, .. } = self.active.take()?;
        trail.finalize(now_millis());
        info!(
            trail = %trail.id,
            points = trail.points.len(),
            distance_m = trail.distance_or_zero(),
            "recording stopped"
        );
        Some(trail)
    }

    /// Tear down without finalizing, e.g. when the owner goes away.
    pub fn abandon(&mut self) -> Option<Trail> {
        let recording = self.active.take()?;
        debug!(trail = %recording.trail.id, "recording abandoned");
        Some(recording.trail)
    }
}

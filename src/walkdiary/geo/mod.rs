//! Positions and distances.
//!
//! - [`distance`]: cumulative great-circle distance and its display format
//! - [`sampler`]: the single-shot sampling policy and the [`PositionSource`] seam
//! - [`gpsd`]: a [`PositionSource`] talking to a local gpsd daemon

pub mod distance;
pub mod gpsd;
pub mod sampler;

pub use distance::{distance, format_distance};
pub use sampler::{GeoSampler, Position, PositionSource, SampleOptions};

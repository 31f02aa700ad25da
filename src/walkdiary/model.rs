use crate::geo::distance;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_PHOTO_MAX_PX: u32 = 800;

/// Milliseconds since the Unix epoch, the timestamp unit used throughout the
/// persisted state.
pub type EpochMillis = i64;

pub fn now_millis() -> EpochMillis {
    Utc::now().timestamp_millis()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Metric => write!(f, "metric"),
            Unit::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "km" => Ok(Unit::Metric),
            "imperial" | "mi" => Ok(Unit::Imperial),
            other => Err(format!(
                "Unknown unit '{}' (expected metric or imperial)",
                other
            )),
        }
    }
}

/// A self-contained image, stored as a `data:` URI so entries carry their
/// photo inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn new(data_uri: String) -> Self {
        Self(data_uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acc: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub ts: EpochMillis,
    pub text: String,
    #[serde(
        default,
        alias = "photoBase64",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo: Option<EncodedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
}

impl Entry {
    pub fn new(text: String, photo: Option<EncodedImage>, loc: Option<Location>) -> Self {
        Self {
            id: new_id(),
            ts: now_millis(),
            text,
            photo,
            loc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub lat: f64,
    pub lng: f64,
    pub ts: EpochMillis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trail {
    pub id: String,
    pub started_at: EpochMillis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<EpochMillis>,
    pub points: Vec<TrailPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

impl Trail {
    pub fn new(started_at: EpochMillis) -> Self {
        Self {
            id: new_id(),
            started_at,
            ended_at: None,
            points: Vec::new(),
            distance_m: None,
        }
    }

    /// Append a point and recompute the distance over the whole sequence.
    pub fn push_point(&mut self, point: TrailPoint) {
        self.points.push(point);
        self.distance_m = Some(distance::distance(&self.points));
    }

    /// Close the trail. The distance is recomputed from the points, never carried over.
    pub fn finalize(&mut self, ended_at: EpochMillis) {
        self.ended_at = Some(ended_at);
        self.distance_m = Some(distance::distance(&self.points));
    }

    /// A trail needs two points before it covers any distance.
    pub fn is_measurable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn distance_or_zero(&self) -> f64 {
        self.distance_m.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub unit: Unit,
    pub photo_max_px: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            unit: Unit::Metric,
            photo_max_px: DEFAULT_PHOTO_MAX_PX,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub entries: Vec<Entry>,
    pub trails: Vec<Trail>,
    pub prefs: Preferences,
}

impl AppState {
    /// Entries newest first.
    pub fn sorted_entries(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by(|a, b| b.ts.cmp(&a.ts));
        entries
    }

    /// Trails newest first.
    pub fn sorted_trails(&self) -> Vec<&Trail> {
        let mut trails: Vec<&Trail> = self.trails.iter().collect();
        trails.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        trails
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64, ts: EpochMillis) -> TrailPoint {
        TrailPoint { lat, lng, ts }
    }

    #[test]
    fn test_push_point_recomputes_distance() {
        let mut trail = Trail::new(0);
        trail.push_point(point(35.0, 139.0, 1));
        assert_eq!(trail.distance_m, Some(0.0));

        trail.push_point(point(35.001, 139.0, 2));
        let d = trail.distance_m.unwrap();
        assert!(d > 100.0 && d < 120.0, "unexpected distance {}", d);
    }

    #[test]
    fn test_finalize_single_point_trail() {
        let mut trail = Trail::new(0);
        trail.push_point(point(35.0, 139.0, 1));
        trail.finalize(10);

        assert_eq!(trail.ended_at, Some(10));
        assert_eq!(trail.distance_m, Some(0.0));
        assert!(!trail.is_measurable());
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("metric".parse::<Unit>().unwrap(), Unit::Metric);
        assert_eq!("Imperial".parse::<Unit>().unwrap(), Unit::Imperial);
        assert!("furlongs".parse::<Unit>().is_err());
    }

    #[test]
    fn test_trail_serializes_camel_case() {
        let mut trail = Trail::new(5);
        trail.finalize(9);
        let json = serde_json::to_value(&trail).unwrap();
        assert_eq!(json["startedAt"], 5);
        assert_eq!(json["endedAt"], 9);
        assert_eq!(json["distanceM"], 0.0);
    }

    #[test]
    fn test_entry_accepts_legacy_photo_field() {
        let json = r#"{"id":"a","ts":1,"text":"hi","photoBase64":"data:image/jpeg;base64,AA=="}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(
            entry.photo.as_ref().map(|p| p.as_str()),
            Some("data:image/jpeg;base64,AA==")
        );
        assert!(entry.loc.is_none());
    }

    #[test]
    fn test_sorted_views_newest_first() {
        let mut state = AppState::default();
        state.trails.push(Trail::new(1));
        state.trails.push(Trail::new(3));
        state.trails.push(Trail::new(2));

        let started: Vec<EpochMillis> = state.sorted_trails().iter().map(|t| t.started_at).collect();
        assert_eq!(started, vec![3, 2, 1]);
    }
}

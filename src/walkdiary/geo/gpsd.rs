//! Position source backed by a gpsd daemon.
//!
//! Each request opens a fresh connection, enables JSON watch mode and waits
//! for the first TPV report carrying a 2D or 3D fix. Reports only start
//! flowing after the watch is enabled, so every answer is a fresh fix.

use super::sampler::{Position, PositionSource, SampleOptions};
use crate::error::{DiaryError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::io::ErrorKind;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::trace;

pub const DEFAULT_GPSD_HOST: &str = "localhost";
pub const DEFAULT_GPSD_PORT: u16 = 2947;

const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// Mode values of a TPV report: 0/1 mean no fix, 2 is 2D, 3 is 3D.
const MODE_2D: u8 = 2;

#[derive(Debug, Clone)]
pub struct GpsdSource {
    host: String,
    port: u16,
}

impl GpsdSource {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GpsdSource {
    fn default() -> Self {
        Self::new(DEFAULT_GPSD_HOST, DEFAULT_GPSD_PORT)
    }
}

#[derive(Debug, Deserialize)]
struct Report {
    class: String,
    #[serde(default)]
    mode: u8,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Estimated horizontal position error (newer gpsd).
    eph: Option<f64>,
    epx: Option<f64>,
    epy: Option<f64>,
}

/// Extract a position from one line of gpsd output, if it is a TPV report
/// with a usable fix.
fn parse_report(line: &str) -> Option<Position> {
    let report: Report = serde_json::from_str(line).ok()?;
    if report.class != "TPV" || report.mode < MODE_2D {
        return None;
    }
    let acc = report
        .eph
        .or_else(|| report.epx.zip(report.epy).map(|(x, y)| x.max(y)));
    Some(Position {
        lat: report.lat?,
        lng: report.lon?,
        acc,
    })
}

fn connect_error(e: std::io::Error) -> DiaryError {
    match e.kind() {
        ErrorKind::ConnectionRefused | ErrorKind::NotFound | ErrorKind::AddrNotAvailable => {
            DiaryError::GeolocationUnavailable
        }
        _ => DiaryError::GeolocationFailed(e.to_string()),
    }
}

#[async_trait]
impl PositionSource for GpsdSource {
    async fn current_position(&self, _options: &SampleOptions) -> Result<Position> {
        let stream = TcpStream::connect(self.address())
            .await
            .map_err(connect_error)?;
        let (read_half, mut write_half) = stream.into_split();

        write_half
            .write_all(WATCH_COMMAND)
            .await
            .map_err(|e| DiaryError::GeolocationFailed(e.to_string()))?;

        let mut lines = BufReader::new(read_half).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| DiaryError::GeolocationFailed(e.to_string()))?
        {
            trace!(%line, "gpsd report");
            if let Some(position) = parse_report(&line) {
                return Ok(position);
            }
        }

        Err(DiaryError::GeolocationFailed(
            "gpsd closed the connection before reporting a fix".to_string(),
        ))
    }
}

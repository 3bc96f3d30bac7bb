//! Position provider backed by a local `gpsd` daemon.
//!
//! Speaks the gpsd JSON protocol over TCP: enable watching, then take the
//! first `TPV` report carrying a usable fix. Reports only arrive after the
//! watch request, so every fix is fresh.

use std::io;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use crate::geo::Coordinate;
use crate::location::{
    HostError, PositionOptions, PositionProvider, PERMISSION_DENIED, POSITION_UNAVAILABLE, TIMEOUT,
};

pub const DEFAULT_GPSD_ADDR: &str = "127.0.0.1:2947";

const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// gpsd NMEA mode: 2 = 2D fix, 3 = 3D fix.
const MODE_2D: u8 = 2;
const MODE_3D: u8 = 3;

#[derive(Debug, Deserialize)]
struct GpsdReport {
    class: String,
    #[serde(default)]
    mode: u8,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct GpsdProvider {
    addr: String,
}

impl GpsdProvider {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn read_fix(&self, require_3d: bool) -> Result<Coordinate, HostError> {
        let stream = TcpStream::connect(&self.addr).await.map_err(host_error_from_io)?;
        let (reader, mut writer) = stream.into_split();
        writer
            .write_all(WATCH_COMMAND)
            .await
            .map_err(host_error_from_io)?;

        let min_mode = if require_3d { MODE_3D } else { MODE_2D };
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await.map_err(host_error_from_io)? {
            let report: GpsdReport = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    debug!("Skipping unparseable gpsd line: {}", e);
                    continue;
                }
            };
            if report.class != "TPV" || report.mode < min_mode {
                continue;
            }
            if let (Some(lat), Some(lon)) = (report.lat, report.lon) {
                return Ok(Coordinate::new(lat, lon));
            }
        }

        Err(HostError::new(
            POSITION_UNAVAILABLE,
            "gpsd closed the stream before reporting a fix",
        ))
    }
}

impl PositionProvider for GpsdProvider {
    async fn request_position(&self, options: PositionOptions) -> Result<Coordinate, HostError> {
        match tokio::time::timeout(options.timeout, self.read_fix(options.high_accuracy)).await {
            Ok(result) => result,
            Err(_) => Err(HostError::new(
                TIMEOUT,
                format!("no fix within {} ms", options.timeout.as_millis()),
            )),
        }
    }
}

fn host_error_from_io(err: io::Error) -> HostError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::NotFound
        | io::ErrorKind::UnexpectedEof => POSITION_UNAVAILABLE,
        io::ErrorKind::TimedOut => TIMEOUT,
        _ => 0,
    };
    HostError::new(code, err.to_string())
}

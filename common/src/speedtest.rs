// Speedtest log parsing
//
// The Ookla CLI appends one CSV row per run. Only four of the columns are
// displayed; rows that are too short or fail to parse are skipped so one
// bad run never blanks the kiosk.

use crate::errors::DisplayError;
use csv::ReaderBuilder;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Minimum field count of a well-formed log row
pub const MIN_RECORD_FIELDS: usize = 21;

const SERVER_FIELD: usize = 0;
const PING_FIELD: usize = 2;
const DOWNLOAD_FIELD: usize = 5;
const UPLOAD_FIELD: usize = 6;

/// One displayed speedtest run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedtestSample {
    pub server: String,
    pub ping_ms: f64,
    pub download_mbps: f64,
    pub upload_mbps: f64,
}

/// The log records throughput in bytes per second
fn mbps_from_bytes_per_second(bytes_per_second: f64) -> f64 {
    bytes_per_second * 8.0 / 1_000_000.0
}

/// Parse a speedtest log, newest run first.
///
/// The header row is skipped. An empty or header-only log yields an empty
/// report rather than an error.
pub fn parse_report<R: Read>(reader: R) -> Result<Vec<SpeedtestSample>, DisplayError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut samples = Vec::new();
    for result in csv_reader.records() {
        let record = result?;

        if record.len() < MIN_RECORD_FIELDS {
            warn!(
                fields = record.len(),
                expected = MIN_RECORD_FIELDS,
                "Skipping malformed log row"
            );
            continue;
        }

        let server = record[SERVER_FIELD].to_string();
        let ping_ms = match record[PING_FIELD].parse::<f64>() {
            Ok(value) => value,
            Err(e) => {
                warn!(field = &record[PING_FIELD], error = %e, "Skipping row with unparseable ping");
                continue;
            }
        };
        let download_bps = match record[DOWNLOAD_FIELD].parse::<f64>() {
            Ok(value) => value,
            Err(e) => {
                warn!(field = &record[DOWNLOAD_FIELD], error = %e, "Skipping row with unparseable download");
                continue;
            }
        };
        let upload_bps = match record[UPLOAD_FIELD].parse::<f64>() {
            Ok(value) => value,
            Err(e) => {
                warn!(field = &record[UPLOAD_FIELD], error = %e, "Skipping row with unparseable upload");
                continue;
            }
        };

        samples.push(SpeedtestSample {
            server,
            ping_ms,
            download_mbps: mbps_from_bytes_per_second(download_bps),
            upload_mbps: mbps_from_bytes_per_second(upload_bps),
        });
    }

    // Newest run on top of the display
    samples.reverse();

    debug!(rows = samples.len(), "Parsed speedtest report");
    Ok(samples)
}

/// Read and parse the speedtest log at `path`
pub fn load_report<P: AsRef<Path>>(path: P) -> Result<Vec<SpeedtestSample>, DisplayError> {
    let file = std::fs::File::open(path)?;
    parse_report(std::io::BufReader::new(file))
}

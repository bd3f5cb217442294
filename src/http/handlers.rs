/// HTTP handlers for the ingest and query endpoints
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, header::HeaderName, HeaderMap, StatusCode};
use axum::Json;
use log::{debug, error, info, warn};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};
use tokio::io::AsyncWriteExt;

use crate::http::types::LatestResp;
use crate::http::AppState;
use crate::models::{RainWindow, ScaledReading, TelemetryRecord};
use crate::{codec, database, decoder, rain, utils};

/// WiFi signal strength below which the relay link is flagged for maintenance
const WEAK_RSSI_DBM: i32 = -85;

/// Lines of the event log shown by GET /api/logs
const LOG_TAIL_LINES: usize = 50;

fn verify_token(headers: &HeaderMap, state: &AppState) -> Result<(), (StatusCode, String)> {
    let expected = format!("Bearer {}", state.config.api_token);
    match headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) if value == expected => Ok(()),
        Some(_) => {
            warn!("Request denied: invalid token");
            Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()))
        }
        None => Err((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        )),
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// POST /api/raw-data — one raw binary message from the sensor relay.
///
/// Diagnostics travel out-of-band in the `x-esp-rssi` and `x-esp-uptime`
/// headers. A message that cannot be decoded is answered 200 with an
/// `ignored`/`error` status so the relay never treats it as a channel
/// failure; only a bad token is a hard rejection.
pub async fn ingest_raw(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, String)> {
    verify_token(&headers, &state)?;

    let rssi: i32 = header_value(&headers, "x-esp-rssi").unwrap_or(0);
    let uptime: i64 = header_value(&headers, "x-esp-uptime").unwrap_or(0);

    if rssi != 0 && rssi < WEAK_RSSI_DBM {
        warn!("Unstable WiFi link on sensor relay ({} dBm)", rssi);
    }

    let raw = body.as_ref();
    let reading = match decoder::decode(raw) {
        Ok(reading) => reading,
        Err(e) => {
            info!("Message discarded: {}", e);
            return Ok(Json(json!({ "status": "ignored", "reason": e.to_string() })));
        }
    };

    let raw_hex = utils::hex_snapshot(raw, decoder::MIN_MESSAGE_LEN);
    debug!("Received frame: {}", raw_hex);

    let record = TelemetryRecord {
        time: OffsetDateTime::now_utc(),
        reading: ScaledReading::from(reading),
        rssi,
        uptime,
        raw_hex,
    };

    // Fire-and-forget: a write failure is logged, never bounced to the relay
    let database_url = state.config.database_url.clone();
    tokio::spawn(async move {
        if let Err(e) = database::store_record(&record, &database_url).await {
            error!("Failed to store telemetry record: {}", e);
        }
    });

    Ok(Json(json!({ "status": "ok" })))
}

/// GET /api/latest — most recent reading with the 24-hour rain window.
pub async fn latest(
    State(state): State<AppState>,
) -> Result<Json<LatestResp>, (StatusCode, String)> {
    let records = database::read_latest(1, &state.config.database_url)
        .await
        .unwrap_or_else(|e| {
            error!("Latest record read failed: {}", e);
            Vec::new()
        });

    let Some(record) = records.into_iter().next() else {
        return Err((StatusCode::NOT_FOUND, "No data recorded yet".to_string()));
    };

    let since = OffsetDateTime::now_utc() - Duration::hours(24);
    let window = match database::read_rain_window(since, &state.config.database_url).await {
        Ok(scaled) => {
            let rain_mm: Vec<f32> = scaled.into_iter().map(|v| codec::descale(Some(v))).collect();
            rain::compute_rain_24h(&rain_mm)
        }
        Err(e) => {
            // Degrade to a zero window rather than failing the whole query
            warn!("Rain window read failed, using defaults: {}", e);
            RainWindow {
                rain_24h: 0.0,
                rain_accumulated: codec::descale(Some(record.reading.rain)),
            }
        }
    };

    Ok(Json(LatestResp::from_record(&record, &window)))
}

/// GET /api/export.csv — full history in physical units.
pub async fn export_csv(
    State(state): State<AppState>,
) -> Result<([(HeaderName, String); 2], String), (StatusCode, String)> {
    let records = database::read_all(&state.config.database_url)
        .await
        .map_err(|e| {
            error!("History read failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "History read failed".to_string(),
            )
        })?;

    if records.is_empty() {
        return Err((StatusCode::NOT_FOUND, "No data available".to_string()));
    }

    let internal = |e: String| (StatusCode::INTERNAL_SERVER_ERROR, e);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "time", "temperature", "humidity", "rain", "wind_avg", "wind_gust", "wind_dir",
            "rssi", "uptime", "raw_hex",
        ])
        .map_err(|e| internal(format!("CSV error: {}", e)))?;

    for record in &records {
        writer
            .write_record(&[
                record
                    .time
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_else(|_| record.time.to_string()),
                format!("{:.1}", codec::descale(Some(record.reading.temperature))),
                record.reading.humidity.to_string(),
                format!("{:.1}", codec::descale(Some(record.reading.rain))),
                format!("{:.1}", codec::descale(Some(record.reading.wind_avg))),
                format!("{:.1}", codec::descale(Some(record.reading.wind_gust))),
                format!("{:.1}", codec::descale(Some(record.reading.wind_dir))),
                record.rssi.to_string(),
                record.uptime.to_string(),
                record.raw_hex.clone(),
            ])
            .map_err(|e| internal(format!("CSV error: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| internal(format!("CSV error: {}", e)))?;
    let body = String::from_utf8(bytes).map_err(|e| internal(format!("CSV error: {}", e)))?;

    let filename = format!(
        "export_{}.csv",
        utils::format_export_stamp(&OffsetDateTime::now_utc())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        body,
    ))
}

/// POST /api/log-error — remote error reporting from the sensor relay.
pub async fn log_error(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, String)> {
    verify_token(&headers, &state)?;

    // Lossy decode so a relay sending corrupted bytes can still report
    let message = String::from_utf8_lossy(&body);
    let entry = format!(
        "[{}]: {}\n",
        utils::format_datetime(&OffsetDateTime::now_utc()),
        message.trim_end()
    );

    let result = async {
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&state.config.event_log_path)
            .await?;
        file.write_all(entry.as_bytes()).await
    }
    .await;

    match result {
        Ok(()) => Ok(Json(json!({ "status": "logged" }))),
        Err(e) => {
            error!("Failed to write event log: {}", e);
            Ok(Json(json!({ "status": "error" })))
        }
    }
}

/// GET /api/logs — tail of the event log.
pub async fn view_logs(State(state): State<AppState>) -> String {
    match tokio::fs::read_to_string(&state.config.event_log_path).await {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(LOG_TAIL_LINES);
            let mut tail = lines[start..].join("\n");
            if !tail.is_empty() {
                tail.push('\n');
            }
            tail
        }
        Err(_) => "Log empty or missing.\n".to_string(),
    }
}

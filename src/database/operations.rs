/// Database operations for the weather station history
use time::OffsetDateTime;

use crate::database::connection::{connect, execute_with_retry};
use crate::models::{ScaledReading, TelemetryRecord};

/// Create the history table if it does not exist yet.
///
/// Measurement columns hold scaled integers (tenths of the physical unit,
/// humidity as the plain percent value) so the table needs no float columns.
pub async fn init_schema(database_url: &str) -> Result<(), String> {
    execute_with_retry(database_url, |client| async move {
        client
            .execute(
                "CREATE TABLE IF NOT EXISTS weather_data (
                    id BIGSERIAL PRIMARY KEY,
                    time TIMESTAMPTZ NOT NULL,
                    temperature INTEGER NOT NULL,
                    humidity INTEGER NOT NULL,
                    rain INTEGER NOT NULL,
                    wind_avg INTEGER NOT NULL,
                    wind_gust INTEGER NOT NULL,
                    wind_dir INTEGER NOT NULL,
                    rssi INTEGER NOT NULL,
                    uptime BIGINT NOT NULL,
                    raw_hex TEXT NOT NULL
                )",
                &[],
            )
            .await
    })
    .await
}

/// Append one telemetry record to the history table.
///
/// This function uses the retry mechanism to handle transient database
/// connection issues; a final failure is the caller's to log, the ingest
/// channel itself never aborts on it.
pub async fn store_record(record: &TelemetryRecord, database_url: &str) -> Result<(), String> {
    // Clone data for move into async closure
    let record = record.clone();

    execute_with_retry(database_url, move |client| {
        let record = record.clone();
        async move {
            client
                .execute(
                    "INSERT INTO weather_data(time, temperature, humidity, rain,
                        wind_avg, wind_gust, wind_dir, rssi, uptime, raw_hex)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
                    &[
                        &record.time,
                        &record.reading.temperature,
                        &record.reading.humidity,
                        &record.reading.rain,
                        &record.reading.wind_avg,
                        &record.reading.wind_gust,
                        &record.reading.wind_dir,
                        &record.rssi,
                        &record.uptime,
                        &record.raw_hex,
                    ],
                )
                .await
        }
    })
    .await
}

/// Scaled rain accumulator values since `since`, ascending by timestamp.
///
/// The ascending order is what the rain accumulation engine relies on.
pub async fn read_rain_window(
    since: OffsetDateTime,
    database_url: &str,
) -> Result<Vec<i32>, String> {
    let client = connect(database_url).await?;

    let rows = client
        .query(
            "SELECT rain FROM weather_data WHERE time >= $1 ORDER BY time ASC",
            &[&since],
        )
        .await
        .map_err(|e| format!("Query error: {}", e))?;

    rows.iter()
        .map(|row| row.try_get(0).map_err(|e| format!("Row error: {}", e)))
        .collect()
}

/// Most recent records, descending by recency.
pub async fn read_latest(limit: i64, database_url: &str) -> Result<Vec<TelemetryRecord>, String> {
    let client = connect(database_url).await?;

    let rows = client
        .query(
            "SELECT time, temperature, humidity, rain, wind_avg, wind_gust, wind_dir,
                    rssi, uptime, raw_hex
             FROM weather_data ORDER BY time DESC LIMIT $1",
            &[&limit],
        )
        .await
        .map_err(|e| format!("Query error: {}", e))?;

    rows.iter().map(record_from_row).collect()
}

/// The full history, ascending by timestamp, for the CSV export.
pub async fn read_all(database_url: &str) -> Result<Vec<TelemetryRecord>, String> {
    let client = connect(database_url).await?;

    let rows = client
        .query(
            "SELECT time, temperature, humidity, rain, wind_avg, wind_gust, wind_dir,
                    rssi, uptime, raw_hex
             FROM weather_data ORDER BY time ASC",
            &[],
        )
        .await
        .map_err(|e| format!("Query error: {}", e))?;

    rows.iter().map(record_from_row).collect()
}

fn record_from_row(row: &tokio_postgres::Row) -> Result<TelemetryRecord, String> {
    let map_err = |e: tokio_postgres::Error| format!("Row error: {}", e);

    Ok(TelemetryRecord {
        time: row.try_get(0).map_err(map_err)?,
        reading: ScaledReading {
            temperature: row.try_get(1).map_err(map_err)?,
            humidity: row.try_get(2).map_err(map_err)?,
            rain: row.try_get(3).map_err(map_err)?,
            wind_avg: row.try_get(4).map_err(map_err)?,
            wind_gust: row.try_get(5).map_err(map_err)?,
            wind_dir: row.try_get(6).map_err(map_err)?,
        },
        rssi: row.try_get(7).map_err(map_err)?,
        uptime: row.try_get(8).map_err(map_err)?,
        raw_hex: row.try_get(9).map_err(map_err)?,
    })
}

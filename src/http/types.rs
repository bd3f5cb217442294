use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use crate::codec;
use crate::models::{RainWindow, TelemetryRecord};

/// Response body for GET /api/latest: the most recent reading in physical
/// units with the current 24-hour rain window attached.
#[derive(Debug, Serialize)]
pub struct LatestResp {
    pub time: String,
    pub temperature: f32,
    pub humidity: i32,
    pub rain_24h: f32,
    pub rain_accumulated: f32,
    pub wind_avg: f32,
    pub wind_gust: f32,
    pub wind_dir: f32,
    pub rssi: i32,
    pub uptime: i64,
}

impl LatestResp {
    pub fn from_record(record: &TelemetryRecord, window: &RainWindow) -> Self {
        LatestResp {
            time: record
                .time
                .format(&Rfc3339)
                .unwrap_or_else(|_| record.time.to_string()),
            temperature: codec::descale(Some(record.reading.temperature)),
            humidity: record.reading.humidity,
            rain_24h: window.rain_24h,
            rain_accumulated: window.rain_accumulated,
            wind_avg: codec::descale(Some(record.reading.wind_avg)),
            wind_gust: codec::descale(Some(record.reading.wind_gust)),
            wind_dir: codec::descale(Some(record.reading.wind_dir)),
            rssi: record.rssi,
            uptime: record.uptime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScaledReading;
    use time::OffsetDateTime;

    #[test]
    fn latest_resp_descales_stored_fields() {
        let record = TelemetryRecord {
            time: OffsetDateTime::UNIX_EPOCH,
            reading: ScaledReading {
                temperature: -258,
                humidity: 50,
                rain: 6778,
                wind_avg: 261,
                wind_gust: 259,
                wind_dir: 2580,
            },
            rssi: -70,
            uptime: 3600,
            raw_hex: "AA55".to_string(),
        };
        let window = RainWindow {
            rain_24h: 12.5,
            rain_accumulated: 677.8,
        };

        let resp = LatestResp::from_record(&record, &window);
        assert_eq!(resp.temperature, -25.8);
        assert_eq!(resp.humidity, 50);
        assert_eq!(resp.rain_24h, 12.5);
        assert_eq!(resp.rain_accumulated, 677.8);
        assert_eq!(resp.wind_avg, 26.1);
        assert_eq!(resp.wind_dir, 258.0);
        assert_eq!(resp.time, "1970-01-01T00:00:00Z");
    }
}

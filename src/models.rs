use time::OffsetDateTime;

use crate::codec;

/// Physical measurements decoded from one raw sensor message.
///
/// Produced only by the message decoder, never persisted directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedReading {
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent, raw byte from the sensor
    pub humidity: u8,
    /// Average wind speed in m/s
    pub wind_avg: f32,
    /// Wind gust in m/s
    pub wind_gust: f32,
    /// Wind direction in degrees (0-511)
    pub wind_dir: f32,
    /// Rain accumulator in mm, monotonic tip counter plus calibration offset
    pub rain: f32,
}

/// Integer-encoded counterpart of a [`DecodedReading`] for storage.
///
/// All fields except humidity carry `round(physical * 10)`; humidity is
/// stored as the plain sensor byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledReading {
    pub temperature: i32,
    pub humidity: i32,
    pub wind_avg: i32,
    pub wind_gust: i32,
    pub wind_dir: i32,
    pub rain: i32,
}

impl From<DecodedReading> for ScaledReading {
    fn from(reading: DecodedReading) -> Self {
        ScaledReading {
            temperature: codec::scale(Some(reading.temperature)),
            humidity: i32::from(reading.humidity),
            wind_avg: codec::scale(Some(reading.wind_avg)),
            wind_gust: codec::scale(Some(reading.wind_gust)),
            wind_dir: codec::scale(Some(reading.wind_dir)),
            rain: codec::scale(Some(reading.rain)),
        }
    }
}

/// A scaled reading plus timestamp and transport diagnostics, as persisted.
#[derive(Debug, Clone)]
pub struct TelemetryRecord {
    pub time: OffsetDateTime,
    pub reading: ScaledReading,
    /// WiFi signal strength reported by the relay, dBm
    pub rssi: i32,
    /// Relay uptime in seconds
    pub uptime: i64,
    /// Uppercase hex snapshot of the first 16 message bytes
    pub raw_hex: String,
}

/// Rolling 24-hour rainfall derived from the stored history; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainWindow {
    /// Rainfall over the trailing 24 hours, mm
    pub rain_24h: f32,
    /// Latest raw accumulator value, mm
    pub rain_accumulated: f32,
}

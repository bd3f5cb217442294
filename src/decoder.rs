/// Decoding of the proprietary Sainlogic binary telemetry message
use std::fmt;

use crate::models::DecodedReading;

/// Shortest message the station ever emits; anything shorter is discarded.
pub const MIN_MESSAGE_LEN: usize = 16;

/// Leading frame marker bytes, not part of the payload.
const HEADER_LEN: usize = 2;

/// Additive calibration offset aligning the raw tip counter to the
/// station's physical baseline, in mm. Must match the deployed firmware.
const RAIN_OFFSET_MM: f32 = 642.2;

/// Why a message could not be decoded.
///
/// This is an expected, non-fatal outcome: the caller logs it and drops the
/// message without disturbing the ingest channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Message shorter than [`MIN_MESSAGE_LEN`] bytes
    TooShort { len: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => {
                write!(f, "message too short: {} bytes, need {}", len, MIN_MESSAGE_LEN)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode one raw station message into physical measurements.
///
/// Payload layout (after the 2-byte header):
/// - Byte 1, low nibble: flag bits carrying the 9th bit of the three wind
///   fields (0x04 direction, 0x02 gust, 0x01 average), needed because those
///   byte-wide fields can exceed 255 raw units
/// - Byte 2: average wind speed, 0.1 m/s units
/// - Byte 3: wind gust, 0.1 m/s units
/// - Byte 4: wind direction in degrees
/// - Bytes 5-6: rain tip counter, 12 bits, 0.1 mm units plus calibration offset
/// - Bytes 7-8: temperature, 12 bits, tenths of Fahrenheit with a 400 offset
/// - Byte 9: relative humidity in percent
///
/// Beyond the minimum length there is no checksum in the frame, so any
/// sufficiently long message decodes; corrupted content yields a syntactically
/// valid but wrong reading. Pure function, deterministic, no I/O.
pub fn decode(raw: &[u8]) -> Result<DecodedReading, DecodeError> {
    if raw.len() < MIN_MESSAGE_LEN {
        return Err(DecodeError::TooShort { len: raw.len() });
    }

    let payload = &raw[HEADER_LEN..];

    // Flag nibble holds the out-of-band MSBs of the wind fields
    let flags = payload[1] & 0x0F;
    let dir_msb = u16::from(flags & 0x04 != 0);
    let gust_msb = u16::from(flags & 0x02 != 0);
    let avg_msb = u16::from(flags & 0x01 != 0);

    // Reconstruct 9-bit wind values (LSB byte + flag MSB)
    let wind_avg = f32::from(u16::from(payload[2]) | (avg_msb << 8)) * 0.1;
    let wind_gust = f32::from(u16::from(payload[3]) | (gust_msb << 8)) * 0.1;
    let wind_dir = f32::from(u16::from(payload[4]) | (dir_msb << 8));

    let raw_rain = (u16::from(payload[5] & 0x0F) << 8) | u16::from(payload[6]);
    let rain = f32::from(raw_rain) * 0.1 + RAIN_OFFSET_MM;

    // The 12-bit counter encodes tenths of degrees Fahrenheit offset by 400
    let raw_temp = (u16::from(payload[7] & 0x0F) << 8) | u16::from(payload[8]);
    let temperature = ((f32::from(raw_temp) - 400.0) / 10.0 - 32.0) * (5.0 / 9.0);

    let humidity = payload[9];

    Ok(DecodedReading {
        temperature,
        humidity,
        wind_avg,
        wind_gust,
        wind_dir,
        rain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScaledReading;

    fn frame(payload: [u8; 14]) -> Vec<u8> {
        let mut msg = vec![0xAA, 0x55];
        msg.extend_from_slice(&payload);
        msg
    }

    #[test]
    fn rejects_short_messages() {
        for len in 0..MIN_MESSAGE_LEN {
            let raw = vec![0u8; len];
            assert_eq!(decode(&raw), Err(DecodeError::TooShort { len }));
        }
    }

    #[test]
    fn extracts_all_fields_with_msb_flags_set() {
        // Flags nibble 0x07 sets the 9th bit of all three wind fields
        let raw = frame([0x00, 0x07, 0x05, 0x03, 0x02, 0x01, 0x64, 0x01, 0x00, 50, 0, 0, 0, 0]);
        let reading = decode(&raw).unwrap();

        assert!((reading.wind_avg - 26.1).abs() < 1e-4);
        assert!((reading.wind_gust - 25.9).abs() < 1e-4);
        assert_eq!(reading.wind_dir, 258.0);
        // raw_rain = 0x164 = 356 -> 35.6 mm + 642.2 mm offset
        assert!((reading.rain - 677.8).abs() < 1e-3);
        assert_eq!(reading.humidity, 50);

        // raw_temp = 256 -> ((256-400)/10 - 32) * 5/9 = -25.77... degC
        let scaled = ScaledReading::from(reading);
        assert_eq!(scaled.temperature, -258);
        assert_eq!(scaled.rain, 6778);
        assert_eq!(scaled.wind_avg, 261);
        assert_eq!(scaled.wind_gust, 259);
        assert_eq!(scaled.wind_dir, 2580);
        assert_eq!(scaled.humidity, 50);
    }

    #[test]
    fn clear_flags_keep_fields_eight_bit() {
        let raw = frame([0x00, 0x00, 0x05, 0x03, 0x02, 0x01, 0x64, 0x01, 0x00, 50, 0, 0, 0, 0]);
        let reading = decode(&raw).unwrap();

        assert!((reading.wind_avg - 0.5).abs() < 1e-4);
        assert!((reading.wind_gust - 0.3).abs() < 1e-4);
        assert_eq!(reading.wind_dir, 2.0);
    }

    #[test]
    fn decode_is_deterministic() {
        let raw = frame([0x12, 0x03, 0x40, 0x60, 0x80, 0x0F, 0xFF, 0x02, 0x33, 87, 1, 2, 3, 4]);
        assert_eq!(decode(&raw), decode(&raw));
    }

    #[test]
    fn header_bytes_are_ignored() {
        let payload = [0x00, 0x01, 0x10, 0x20, 0x30, 0x00, 0x10, 0x01, 0x90, 60, 0, 0, 0, 0];
        let mut a = frame(payload);
        let mut b = frame(payload);
        a[0] = 0x00;
        a[1] = 0xFF;
        b[0] = 0xDE;
        b[1] = 0xAD;
        assert_eq!(decode(&a), decode(&b));
    }
}

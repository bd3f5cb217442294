/// Utility functions for data formatting
use time::{format_description, OffsetDateTime};

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Compact timestamp used in the CSV export filename
pub fn format_export_stamp(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[year][month][day]_[hour][minute]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Uppercase hex snapshot of a message prefix, kept alongside each record
/// so decoder issues can be diagnosed after the fact.
pub fn hex_snapshot(bytes: &[u8], max_len: usize) -> String {
    bytes
        .iter()
        .take(max_len)
        .map(|b| format!("{:02X}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_snapshot_is_uppercase_and_truncated() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF, 0x0A];
        assert_eq!(hex_snapshot(&bytes, 4), "DEADBEEF");
        assert_eq!(hex_snapshot(&bytes, 16), "DEADBEEF0A");
        assert_eq!(hex_snapshot(&[], 16), "");
    }
}

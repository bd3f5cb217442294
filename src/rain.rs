/// Reset-tolerant 24-hour rainfall accumulation
use crate::models::RainWindow;

/// Derive the trailing 24-hour rainfall from an ordered accumulator history.
///
/// The gauge reports a monotonically increasing tip counter (mm, after
/// calibration), which wraps back toward its 642.2 mm baseline when the
/// 12-bit raw counter overflows at 1051.7 mm. A plain `latest - earliest`
/// delta would go negative across such a reset, so the total is built from
/// consecutive increments instead: a decrease between samples is read as a
/// counter reset and its full magnitude counts as rainfall.
///
/// `rain_mm` must already be filtered to the 24-hour window and sorted
/// ascending by timestamp; that ordering is the caller's contract (the
/// storage query orders it) and is not re-validated here.
pub fn compute_rain_24h(rain_mm: &[f32]) -> RainWindow {
    let Some(&latest) = rain_mm.last() else {
        return RainWindow {
            rain_24h: 0.0,
            rain_accumulated: 0.0,
        };
    };

    let mut total = 0.0f32;
    for pair in rain_mm.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        if current >= previous {
            total += current - previous;
        } else {
            // Counter reset between the two samples; the drop magnitude is
            // rain that fell during the reset interval
            total += previous - current;
        }
    }

    RainWindow {
        rain_24h: (total * 10.0).round() / 10.0,
        rain_accumulated: (latest * 10.0).round() / 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_yields_zero() {
        let window = compute_rain_24h(&[]);
        assert_eq!(window.rain_24h, 0.0);
        assert_eq!(window.rain_accumulated, 0.0);
    }

    #[test]
    fn single_sample_has_no_observable_delta() {
        let window = compute_rain_24h(&[77.3]);
        assert_eq!(window.rain_24h, 0.0);
        assert_eq!(window.rain_accumulated, 77.3);
    }

    #[test]
    fn sums_increments_across_a_counter_reset() {
        // 200 -> 5 is a reset; its 195 mm drop still counts as rainfall
        let window = compute_rain_24h(&[100.0, 150.0, 200.0, 5.0, 40.0]);
        assert_eq!(window.rain_24h, 330.0);
        assert_eq!(window.rain_accumulated, 40.0);
    }

    #[test]
    fn steady_counter_accumulates_nothing() {
        let window = compute_rain_24h(&[650.0, 650.0, 650.0]);
        assert_eq!(window.rain_24h, 0.0);
        assert_eq!(window.rain_accumulated, 650.0);
    }

    #[test]
    fn total_is_never_negative() {
        let histories: [&[f32]; 4] = [
            &[1051.7, 642.2],
            &[700.0, 650.0, 700.0, 650.0],
            &[0.0, 0.0, 1000.0, 0.0],
            &[642.2, 643.1, 650.9, 642.3, 644.0],
        ];
        for history in histories {
            assert!(compute_rain_24h(history).rain_24h >= 0.0);
        }
    }

    #[test]
    fn rounds_to_one_decimal() {
        let window = compute_rain_24h(&[642.2, 642.5, 643.1]);
        assert_eq!(window.rain_24h, 0.9);
        assert_eq!(window.rain_accumulated, 643.1);
    }
}

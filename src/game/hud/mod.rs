//! On-screen readouts of the run and the UI consumers of gameplay messages.

mod chat;
mod report;
mod stopwatch;

use std::time::Duration;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((stopwatch::plugin, report::plugin, chat::plugin));
}

/// Stopwatch format, `mm:ss.cc`.
pub fn format_stopwatch(time: Duration) -> String {
    let (minutes, seconds, centis) = split_time(time);
    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

/// Report format, `m:ss.cc`.
pub fn format_split(time: Duration) -> String {
    let (minutes, seconds, centis) = split_time(time);
    format!("{minutes}:{seconds:02}.{centis:02}")
}

fn split_time(time: Duration) -> (u128, u128, u128) {
    let millis = time.as_millis();
    (millis / 60_000, millis % 60_000 / 1000, millis % 1000 / 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_format() {
        assert_eq!(format_stopwatch(Duration::ZERO), "00:00.00");
        assert_eq!(format_stopwatch(Duration::from_millis(2_900)), "00:02.90");
        assert_eq!(format_stopwatch(Duration::from_millis(754_321)), "12:34.32");
    }

    #[test]
    fn test_split_format() {
        assert_eq!(format_split(Duration::from_millis(900)), "0:00.90");
        assert_eq!(format_split(Duration::from_millis(65_432)), "1:05.43");
    }

    #[test]
    fn test_centiseconds_truncate() {
        assert_eq!(format_split(Duration::from_millis(1_999)), "0:01.99");
        assert_eq!(format_stopwatch(Duration::from_micros(9_999)), "00:00.00");
    }
}

//! Start/stop timing for event records.

use chrono::{DateTime, SecondsFormat, Utc};

use super::schema::Event;

/// Format a UTC instant the way event-log timestamps are written.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as an event-log timestamp.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Mark `event.start` with the current time.
pub fn start_timing(event: &mut Event) {
    start_timing_at(event, Utc::now());
}

/// Mark `event.end` and `event.duration`. No-op unless `event.start` holds a
/// parseable timestamp.
pub fn stop_timing(event: &mut Event) {
    stop_timing_at(event, Utc::now());
}

pub fn start_timing_at(event: &mut Event, at: DateTime<Utc>) {
    event.event.start = Some(format_timestamp(at));
}

pub fn stop_timing_at(event: &mut Event, at: DateTime<Utc>) {
    let Some(start) = event
        .event
        .start
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    else {
        tracing::debug!("stop_timing called on an event without a valid start");
        return;
    };

    let elapsed = at.signed_duration_since(start.with_timezone(&Utc));
    event.event.end = Some(format_timestamp(at));
    event.event.duration = elapsed.num_nanoseconds();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn timestamps_use_millis_and_z_suffix() {
        assert_eq!(format_timestamp(at(0)), "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn stop_records_end_and_duration_in_nanos() {
        let mut event = Event::default();
        start_timing_at(&mut event, at(0));
        stop_timing_at(&mut event, at(0) + Duration::milliseconds(1500));

        assert_eq!(event.event.start.as_deref(), Some("2023-11-14T22:13:20.000Z"));
        assert_eq!(event.event.end.as_deref(), Some("2023-11-14T22:13:21.500Z"));
        assert_eq!(event.event.duration, Some(1_500_000_000));
    }

    #[test]
    fn stop_without_start_is_noop() {
        let mut event = Event::default();
        stop_timing_at(&mut event, at(5));
        assert!(event.event.end.is_none());
        assert!(event.event.duration.is_none());
    }

    #[test]
    fn stop_with_garbage_start_is_noop() {
        let mut event = Event::default();
        event.event.start = Some("yesterday".into());
        stop_timing_at(&mut event, at(5));
        assert!(event.event.end.is_none());
    }

    #[test]
    fn live_clock_produces_non_negative_duration() {
        let mut event = Event::default();
        start_timing(&mut event);
        stop_timing(&mut event);
        assert!(event.event.duration.unwrap() >= 0);
    }
}

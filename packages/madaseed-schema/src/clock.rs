//! Timestamp service
//!
//! Timezone-aware UTC instants. The wall clock gives no monotonicity
//! guarantee, so stage completion times are clamped against the latest
//! timestamp already recorded in the Seed to keep the cross-stage ordering
//! invariant: creation(L1) <= completion(L1) <= ... <= completion(L7).

use chrono::{DateTime, SecondsFormat, Utc};

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Current instant, clamped so it never sorts before `floor`.
pub fn now_no_earlier_than(floor: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match floor {
        Some(f) if f > now => f,
        _ => now,
    }
}

/// Parse an RFC-3339 / ISO-8601 timestamp into a UTC instant.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

/// RFC-3339 `Z`-suffixed rendering, second precision.
pub fn to_rfc3339_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_now_is_utc() {
        let now = now_utc();
        assert_eq!(now.timezone(), Utc);
    }

    #[test]
    fn test_clamp_respects_future_floor() {
        let floor = now_utc() + Duration::seconds(3600);
        let clamped = now_no_earlier_than(Some(floor));
        assert_eq!(clamped, floor);
    }

    #[test]
    fn test_clamp_ignores_past_floor() {
        let floor = now_utc() - Duration::seconds(3600);
        let clamped = now_no_earlier_than(Some(floor));
        assert!(clamped > floor);
    }

    #[test]
    fn test_parse_utc_accepts_z_suffix() {
        let dt = parse_utc("2024-05-01T12:30:00Z").unwrap();
        assert_eq!(to_rfc3339_utc(dt), "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_parse_utc_normalizes_offsets() {
        let dt = parse_utc("2024-05-01T14:30:00+02:00").unwrap();
        assert_eq!(to_rfc3339_utc(dt), "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_parse_utc_rejects_garbage() {
        assert!(parse_utc("not-a-timestamp").is_err());
        assert!(parse_utc("2024-13-99T99:99:99Z").is_err());
    }
}

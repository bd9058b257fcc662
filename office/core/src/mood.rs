//! Mood Derivation
//!
//! An agent's expression is derived on demand from recency signals rather
//! than stored. The priority order is deliberate: a rate-limited agent must
//! read as blocked even if it just finished a successful action, because the
//! pause is the operationally important signal to surface.

use std::time::Instant;

use crate::config::MoodConfig;

/// Expressive state drawn on an agent's face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mood {
    #[default]
    Neutral,
    Focused,
    Stressed,
    Blocked,
}

/// Compute the mood from recency signals.
///
/// Priority: blocked > stressed > focused > neutral.
#[must_use]
pub fn compute(
    blocked: bool,
    has_error: bool,
    last_error_at: Option<Instant>,
    last_activity_at: Option<Instant>,
    now: Instant,
    config: &MoodConfig,
) -> Mood {
    if blocked {
        return Mood::Blocked;
    }

    if has_error {
        return Mood::Stressed;
    }
    if let Some(at) = last_error_at {
        if now.saturating_duration_since(at) < config.stressed_window() {
            return Mood::Stressed;
        }
    }

    if let Some(at) = last_activity_at {
        if now.saturating_duration_since(at) < config.focused_window() {
            return Mood::Focused;
        }
    }

    Mood::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base() -> Instant {
        Instant::now()
    }

    #[test]
    fn test_priority_table_exhaustive() {
        // Enumerate every combination of the four inputs: blocked flag,
        // error flag, recent error, recent activity.
        let config = MoodConfig::default();
        let now = base() + Duration::from_secs(60);
        let recent_error = now - Duration::from_millis(1000); // inside 5000ms
        let recent_activity = now - Duration::from_millis(500); // inside 2000ms

        for bits in 0u8..16 {
            let blocked = bits & 0b0001 != 0;
            let has_error = bits & 0b0010 != 0;
            let error_recent = bits & 0b0100 != 0;
            let activity_recent = bits & 0b1000 != 0;

            let last_error_at = error_recent.then_some(recent_error);
            let last_activity_at = activity_recent.then_some(recent_activity);

            let expected = if blocked {
                Mood::Blocked
            } else if has_error || error_recent {
                Mood::Stressed
            } else if activity_recent {
                Mood::Focused
            } else {
                Mood::Neutral
            };

            let got = compute(
                blocked,
                has_error,
                last_error_at,
                last_activity_at,
                now,
                &config,
            );
            assert_eq!(got, expected, "inputs: {bits:04b}");
        }
    }

    #[test]
    fn test_blocked_dominates_everything() {
        let config = MoodConfig::default();
        let now = base() + Duration::from_secs(10);
        let mood = compute(true, true, Some(now), Some(now), now, &config);
        assert_eq!(mood, Mood::Blocked);
    }

    #[test]
    fn test_stale_error_is_not_stressed() {
        let config = MoodConfig::default();
        let now = base() + Duration::from_secs(60);
        let old_error = now - Duration::from_millis(5001);
        let mood = compute(false, false, Some(old_error), None, now, &config);
        assert_eq!(mood, Mood::Neutral);
    }

    #[test]
    fn test_recent_activity_is_focused() {
        let config = MoodConfig::default();
        let now = base() + Duration::from_secs(60);
        let mood = compute(
            false,
            false,
            None,
            Some(now - Duration::from_millis(1999)),
            now,
            &config,
        );
        assert_eq!(mood, Mood::Focused);

        let stale = compute(
            false,
            false,
            None,
            Some(now - Duration::from_millis(2000)),
            now,
            &config,
        );
        assert_eq!(stale, Mood::Neutral);
    }
}

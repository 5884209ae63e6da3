//! Relative age formatting for notification timestamps.

use chrono::{DateTime, Utc};

/// Format the elapsed time since `created_at` for display.
///
/// Fixed thresholds: whole minutes under 60 minutes, whole hours under 24
/// hours, whole days otherwise. Zero or negative elapsed time floors to
/// "0m ago".
pub fn relative_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let minutes = elapsed.num_minutes();

    if minutes < 60 {
        format!("{}m ago", minutes.max(0))
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2026-08-06T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn minutes_under_the_hour_cutover() {
        let t = now();
        assert_eq!(relative_age(t - Duration::minutes(59), t), "59m ago");
        assert_eq!(relative_age(t - Duration::minutes(1), t), "1m ago");
    }

    #[test]
    fn cutover_to_hours_at_sixty_minutes() {
        let t = now();
        assert_eq!(relative_age(t - Duration::minutes(60), t), "1h ago");
        assert_eq!(relative_age(t - Duration::hours(23), t), "23h ago");
    }

    #[test]
    fn cutover_to_days_at_twenty_four_hours() {
        let t = now();
        assert_eq!(relative_age(t - Duration::hours(24), t), "1d ago");
        assert_eq!(relative_age(t - Duration::days(3), t), "3d ago");
    }

    #[test]
    fn zero_and_negative_elapsed_floor_to_zero_minutes() {
        let t = now();
        assert_eq!(relative_age(t, t), "0m ago");
        assert_eq!(relative_age(t + Duration::minutes(5), t), "0m ago");
        assert_eq!(relative_age(t - Duration::seconds(59), t), "0m ago");
    }
}

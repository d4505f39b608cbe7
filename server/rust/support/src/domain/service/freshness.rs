use chrono::{DateTime, Duration, Utc};

/// リモートチェック結果を再利用できる既定の期間（24 時間）。
pub const DEFAULT_FRESHNESS_WINDOW_SECS: i64 = 86_400;

/// 最終チェック時刻から window 未満しか経過していなければ true を返す。
/// 一度もチェックしていない場合は常に false。
pub fn is_fresh(now: DateTime<Utc>, last_check: Option<DateTime<Utc>>, window: Duration) -> bool {
    match last_check {
        Some(checked_at) => now.signed_duration_since(checked_at) < window,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Duration {
        Duration::seconds(DEFAULT_FRESHNESS_WINDOW_SECS)
    }

    #[test]
    fn test_never_checked_is_stale() {
        assert!(!is_fresh(Utc::now(), None, window()));
    }

    #[test]
    fn test_within_window_is_fresh() {
        let now = Utc::now();
        assert!(is_fresh(now, Some(now - Duration::hours(23)), window()));
    }

    #[test]
    fn test_exact_window_boundary_is_stale() {
        let now = Utc::now();
        assert!(!is_fresh(now, Some(now - window()), window()));
    }

    #[test]
    fn test_past_window_is_stale() {
        let now = Utc::now();
        assert!(!is_fresh(now, Some(now - Duration::hours(25)), window()));
    }
}

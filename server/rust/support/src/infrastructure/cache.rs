//! FreshnessCache はリモートチェック結果を 1 件だけ保持するインメモリキャッシュ。
//! 最終チェック時刻から window 未満の間だけ値を「新鮮」として返す。
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::domain::service::is_fresh;

#[derive(Debug, Clone)]
struct CachedCheck<T> {
    last_check_time: Option<DateTime<Utc>>,
    value: T,
}

pub struct FreshnessCache<T> {
    inner: RwLock<CachedCheck<T>>,
    window: Duration,
}

impl<T: Clone + Send + Sync> FreshnessCache<T> {
    /// 未チェック状態のキャッシュを作成する。
    ///
    /// # Arguments
    /// * `initial` - 一度もチェックしていない間の値
    /// * `window` - 値を新鮮とみなす期間
    pub fn new(initial: T, window: Duration) -> Self {
        Self {
            inner: RwLock::new(CachedCheck {
                last_check_time: None,
                value: initial,
            }),
            window,
        }
    }

    /// 新鮮な場合のみ値を返す。未チェックまたは期限切れなら None。
    pub async fn fresh_value(&self, now: DateTime<Utc>) -> Option<T> {
        let cached = self.inner.read().await;
        if is_fresh(now, cached.last_check_time, self.window) {
            Some(cached.value.clone())
        } else {
            None
        }
    }

    /// 鮮度にかかわらず最後に記録した値を返す。
    pub async fn value(&self) -> T {
        self.inner.read().await.value.clone()
    }

    /// 値とチェック時刻を記録する。
    pub async fn record(&self, now: DateTime<Utc>, value: T) {
        let mut cached = self.inner.write().await;
        cached.last_check_time = Some(now);
        cached.value = value;
    }

    #[cfg(test)]
    pub async fn last_check_time(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_check_time
    }
}

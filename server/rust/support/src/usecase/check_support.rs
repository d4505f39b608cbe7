use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::repository::EntitlementGateway;
use crate::domain::service::enterprise_repo_url;
use crate::infrastructure::cache::FreshnessCache;
use crate::infrastructure::clock::Clock;

/// SupportCheck は GET /support/check のレスポンス本体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportCheck {
    pub pass: bool,
}

/// SupportCheckSettings はサポート契約確認に必要な設定値。
#[derive(Debug, Clone)]
pub struct SupportCheckSettings {
    pub product_version: String,
    pub token: Option<SecretString>,
    pub repo_url_template: String,
}

/// CheckSupportUseCase はエンタープライズリポジトリへのアクセス可否でサポート契約を確認する。
/// 成功結果のみキャッシュし、鮮度期間内はリモートへ問い合わせない。
pub struct CheckSupportUseCase {
    gateway: Arc<dyn EntitlementGateway>,
    cache: Arc<FreshnessCache<bool>>,
    clock: Arc<dyn Clock>,
    settings: SupportCheckSettings,
}

impl CheckSupportUseCase {
    pub fn new(
        gateway: Arc<dyn EntitlementGateway>,
        cache: Arc<FreshnessCache<bool>>,
        clock: Arc<dyn Clock>,
        settings: SupportCheckSettings,
    ) -> Self {
        Self {
            gateway,
            cache,
            clock,
            settings,
        }
    }

    pub async fn execute(&self) -> SupportCheck {
        let Some(token) = self.settings.token.as_ref() else {
            return SupportCheck { pass: false };
        };
        if self.settings.product_version.is_empty() {
            return SupportCheck { pass: false };
        }

        let now = self.clock.now();
        if self.cache.fresh_value(now).await == Some(true) {
            return SupportCheck { pass: true };
        }

        let Some(url) =
            enterprise_repo_url(&self.settings.repo_url_template, &self.settings.product_version)
        else {
            warn!(
                product_version = %self.settings.product_version,
                "product version cannot be mapped to an enterprise release"
            );
            return SupportCheck { pass: false };
        };

        match self.gateway.probe(&url, token.expose_secret()).await {
            Ok(status) if status < 400 => {
                info!(url = %url, status, "support entitlement confirmed");
                self.cache.record(now, true).await;
                SupportCheck { pass: true }
            }
            Ok(status) => {
                warn!(url = %url, status, "support entitlement rejected");
                SupportCheck { pass: false }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "support entitlement check failed");
                SupportCheck { pass: false }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::remote_check::MockEntitlementGateway;
    use crate::domain::repository::RemoteCheckError;
    use crate::infrastructure::clock::ManualClock;
    use chrono::{Duration, Utc};

    fn settings(version: &str, token: Option<&str>) -> SupportCheckSettings {
        SupportCheckSettings {
            product_version: version.to_string(),
            token: token.map(|t| SecretString::new(t.to_string())),
            repo_url_template: "https://repo.example.com/<VERSION>/".to_string(),
        }
    }

    fn make_usecase(
        gateway: MockEntitlementGateway,
        clock: Arc<ManualClock>,
        settings: SupportCheckSettings,
    ) -> CheckSupportUseCase {
        CheckSupportUseCase::new(
            Arc::new(gateway),
            Arc::new(FreshnessCache::new(false, Duration::hours(24))),
            clock,
            settings,
        )
    }

    #[tokio::test]
    async fn test_without_token_skips_network() {
        let mut gateway = MockEntitlementGateway::new();
        gateway.expect_probe().never();
        let clock = Arc::new(ManualClock::new(Utc::now()));

        let uc = make_usecase(gateway, clock.clone(), settings("5.12.4", None));
        assert!(!uc.execute().await.pass);

        let mut gateway = MockEntitlementGateway::new();
        gateway.expect_probe().never();
        let uc = make_usecase(gateway, clock, settings("", Some("token")));
        assert!(!uc.execute().await.pass);
    }

    #[tokio::test]
    async fn test_probe_uses_even_minor_release_and_token() {
        let mut gateway = MockEntitlementGateway::new();
        gateway
            .expect_probe()
            .withf(|url, token| url == "https://repo.example.com/5.12/" && token == "user:secret")
            .times(1)
            .returning(|_, _| Ok(200));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let uc = make_usecase(gateway, clock, settings("5.13.85", Some("user:secret")));

        assert!(uc.execute().await.pass);
    }

    #[tokio::test]
    async fn test_success_is_cached_for_window() {
        let mut gateway = MockEntitlementGateway::new();
        gateway.expect_probe().times(2).returning(|_, _| Ok(200));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let uc = make_usecase(gateway, clock.clone(), settings("5.12.4", Some("token")));

        assert!(uc.execute().await.pass);
        clock.advance(Duration::hours(23));
        assert!(uc.execute().await.pass);

        // 鮮度期間を過ぎるとちょうど 1 回だけ再確認する
        clock.advance(Duration::hours(2));
        assert!(uc.execute().await.pass);
        assert!(uc.execute().await.pass);
    }

    #[tokio::test]
    async fn test_rejected_probe_is_not_cached() {
        let mut gateway = MockEntitlementGateway::new();
        gateway.expect_probe().times(2).returning(|_, _| Ok(401));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let uc = make_usecase(gateway, clock, settings("5.12.4", Some("token")));

        assert!(!uc.execute().await.pass);
        assert!(!uc.execute().await.pass);
    }

    #[tokio::test]
    async fn test_transport_error_is_false() {
        let mut gateway = MockEntitlementGateway::new();
        gateway
            .expect_probe()
            .returning(|_, _| Err(RemoteCheckError::Transport("dns failure".to_string())));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let uc = make_usecase(gateway, clock, settings("5.12.4", Some("token")));

        assert!(!uc.execute().await.pass);
    }

    #[tokio::test]
    async fn test_unnormalizable_version_is_false() {
        let mut gateway = MockEntitlementGateway::new();
        gateway.expect_probe().never();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let uc = make_usecase(gateway, clock, settings("5", Some("token")));

        assert!(!uc.execute().await.pass);
    }
}

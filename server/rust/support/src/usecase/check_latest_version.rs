use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::repository::{ReleaseTagGateway, TagFetch};
use crate::domain::service::fold_release_tags;
use crate::infrastructure::cache::FreshnessCache;
use crate::infrastructure::clock::Clock;

/// LatestVersion は最新バージョン確認の結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestVersion {
    Known(String),
    /// タグ一覧を取得できなかった。レスポンスでは version: 0 になる。
    Unavailable,
}

/// LatestVersionBody は GET /support/check/version のレスポンス本体。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LatestVersionBody {
    Known { version: String },
    Unavailable { version: u8 },
}

impl From<&LatestVersion> for LatestVersionBody {
    fn from(latest: &LatestVersion) -> Self {
        match latest {
            LatestVersion::Known(version) => LatestVersionBody::Known {
                version: version.clone(),
            },
            LatestVersion::Unavailable => LatestVersionBody::Unavailable { version: 0 },
        }
    }
}

/// CheckLatestVersionUseCase はリリースタグ一覧から最新バージョンを求める。
pub struct CheckLatestVersionUseCase {
    gateway: Arc<dyn ReleaseTagGateway>,
    cache: Arc<FreshnessCache<String>>,
    clock: Arc<dyn Clock>,
    tag_prefix: String,
}

impl CheckLatestVersionUseCase {
    pub fn new(
        gateway: Arc<dyn ReleaseTagGateway>,
        cache: Arc<FreshnessCache<String>>,
        clock: Arc<dyn Clock>,
        tag_prefix: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            cache,
            clock,
            tag_prefix: tag_prefix.into(),
        }
    }

    pub async fn execute(&self) -> LatestVersion {
        let now = self.clock.now();
        if let Some(version) = self.cache.fresh_value(now).await {
            return LatestVersion::Known(version);
        }

        match self.gateway.fetch_tags().await {
            Ok(TagFetch::Listed(tags)) => {
                // 前回の最新バージョンを初期値として畳み込む
                let seed = self.cache.value().await;
                let latest = fold_release_tags(
                    &seed,
                    &self.tag_prefix,
                    tags.iter().filter_map(|t| t.name.as_deref()),
                );
                info!(version = %latest, tags = tags.len(), "latest release resolved");
                self.cache.record(now, latest.clone()).await;
                LatestVersion::Known(latest)
            }
            Ok(TagFetch::Rejected(status)) => {
                warn!(status, "release tag listing rejected");
                LatestVersion::Unavailable
            }
            Err(e) => {
                warn!(error = %e, "release tag listing failed");
                LatestVersion::Unavailable
            }
        }
    }
}

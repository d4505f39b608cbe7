//! アップロードファイルの一時配置。
//!
//! サーバーが書き出したファイルは StagedUpload がスコープを抜けると必ず削除される。
//! 名前で解決した既存ファイルは claim されるまで削除対象にならない。

use std::path::{Component, Path, PathBuf};

use tracing::warn;

/// StagedUpload は一時ディレクトリに置かれたアップロード対象ファイル。
#[derive(Debug)]
pub struct StagedUpload {
    name: String,
    path: PathBuf,
    owned: bool,
}

impl StagedUpload {
    fn new(name: String, path: PathBuf, owned: bool) -> Self {
        Self { name, path, owned }
    }

    /// 以降は Drop でファイルを削除する。認証済みの呼び出し元だけが呼ぶ。
    pub fn claim(&mut self) {
        self.owned = true;
    }

    /// コメント本文とアップロード名に使うファイル名。
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove staged upload");
            }
        }
    }
}

/// TempUploadResolver は一時ディレクトリ内のファイル名を解決し、StagedUpload を作る。
#[derive(Debug, Clone)]
pub struct TempUploadResolver {
    dir: PathBuf,
}

impl TempUploadResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 事前に一時ディレクトリへ配置済みのファイルを名前で解決する。
    /// ディレクトリ外を指す名前や存在しないファイルは None。
    /// 返す StagedUpload は claim するまでファイルを削除しない。
    pub fn resolve(&self, name: &str) -> Option<StagedUpload> {
        let name = sanitize_name(name)?;
        let path = self.dir.join(&name);
        if !path.is_file() {
            return None;
        }
        Some(StagedUpload::new(name, path, false))
    }

    /// アップロードされた内容を一時ディレクトリへ書き出す。
    pub async fn stage(&self, file_name: &str, contents: &[u8]) -> std::io::Result<StagedUpload> {
        let name = sanitize_name(file_name).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid upload file name")
        })?;
        let path = tempfile::Builder::new()
            .prefix("support-upload-")
            .tempfile_in(&self.dir)?
            .into_temp_path()
            .keep()
            .map_err(|e| e.error)?;

        // 書き込みに失敗した場合も staged の Drop でファイルが消える
        let staged = StagedUpload::new(name, path, true);
        tokio::fs::write(staged.path(), contents).await?;
        Ok(staged)
    }
}

/// パス区切りや親ディレクトリ参照を含まない単一のファイル名だけを受け付ける。
fn sanitize_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part.to_str().map(str::to_string),
        _ => None,
    }
}

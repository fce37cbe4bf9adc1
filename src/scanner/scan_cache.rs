use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

use crate::models::{Project, ScanCacheEntry};

/// 扫描结果缓存
///
/// 内存中只保存最后一次完整扫描的结果，可选地同步写入 JSON 文件，
/// 供下次启动时预热。是否过期由调用方根据 [`ScanCacheEntry::is_fresh`] 判断。
#[derive(Debug, Default)]
pub struct ScanCache {
    /// 缓存文件路径，为空时只在内存中缓存
    cache_file: Option<PathBuf>,

    /// 最后一次扫描结果
    entry: RwLock<Option<ScanCacheEntry>>,
}

impl ScanCache {
    /// 只在内存中缓存
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// 使用缓存文件，文件存在时加载其中的数据
    ///
    /// 文件缺失或格式错误都当作空缓存处理。
    pub async fn with_file(cache_file: PathBuf) -> Self {
        let entry = Self::load_file(&cache_file).await;
        Self {
            cache_file: Some(cache_file),
            entry: RwLock::new(entry),
        }
    }

    /// 读取缓存条目（可能已过期）
    pub async fn get(&self) -> Option<ScanCacheEntry> {
        self.entry.read().await.clone()
    }

    /// 写入新的扫描结果
    ///
    /// 内存中的条目总会被更新；写文件失败时返回错误，由调用方记录。
    pub async fn put(&self, projects: Vec<Project>) -> Result<()> {
        let entry = ScanCacheEntry::new(projects);

        let content = match &self.cache_file {
            Some(_) => Some(serde_json::to_string(&entry)?),
            None => None,
        };

        *self.entry.write().await = Some(entry);

        if let (Some(path), Some(content)) = (&self.cache_file, content) {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(path, content).await?;
            tracing::debug!("scan cache written to {}", path.display());
        }

        Ok(())
    }

    /// 清除内存和文件中的缓存，下次读取会触发重新扫描
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;

        if let Some(path) = &self.cache_file {
            if let Err(err) = fs::remove_file(path).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("failed to remove scan cache {}: {}", path.display(), err);
                }
            }
        }
    }

    async fn load_file(path: &Path) -> Option<ScanCacheEntry> {
        let content = fs::read_to_string(path).await.ok()?;

        match serde_json::from_str::<ScanCacheEntry>(&content) {
            Ok(entry) => Some(entry),
            Err(err) => {
                // 缓存文件格式错误，重新开始
                tracing::warn!("ignoring corrupt scan cache {}: {}", path.display(), err);
                None
            }
        }
    }
}

use chrono::Utc;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::{CacheConfig, Config, Settings};
use crate::error::CatalogError;
use crate::models::{
    Annotation, AnnotationUpdate, Project, ProjectId, ProjectListing, ScanCacheEntry,
};
use crate::operations::annotations::AnnotationStore;
use crate::operations::guard::ensure_within_root;
use crate::operations::merge::merge_with_persisted;
use crate::scanner::{DirectoryWalker, GitAnalyzer, ProjectScanner, ScanCache, VersionControl};

/// 标注文件名
pub const ANNOTATIONS_FILE: &str = "projects.json";

/// 扫描缓存文件名
pub const CACHE_FILE: &str = "cache.json";

/// 归档目录名
pub const ARCHIVE_DIR: &str = "_Archive";

/// 项目管理器 - 负责缓存、扫描、合并标注以及归档等用户操作
pub struct ProjectManager<V = GitAnalyzer> {
    /// 用户设置
    settings: Settings,

    /// 项目扫描器
    scanner: ProjectScanner<V>,

    /// 最后一次扫描的缓存
    cache: Arc<ScanCache>,

    /// 缓存配置
    cache_config: CacheConfig,

    /// 用户标注存储
    annotations: AnnotationStore,

    /// 最近一次后台缓存写入任务
    pending_cache_write: Mutex<Option<JoinHandle<()>>>,
}

impl ProjectManager<GitAnalyzer> {
    /// 根据配置创建管理器，数据文件位于配置的数据目录
    pub async fn from_config(config: &Config) -> Self {
        let data_dir = config.data_dir();

        let cache = if config.cache.persist {
            ScanCache::with_file(data_dir.join(CACHE_FILE)).await
        } else {
            ScanCache::in_memory()
        };

        Self::new(
            config.settings.clone(),
            ProjectScanner::from_config(&config.scan),
            cache,
            config.cache.clone(),
            AnnotationStore::new(data_dir.join(ANNOTATIONS_FILE)),
        )
    }
}

impl<V: VersionControl> ProjectManager<V> {
    pub fn new(
        settings: Settings,
        scanner: ProjectScanner<V>,
        cache: ScanCache,
        cache_config: CacheConfig,
        annotations: AnnotationStore,
    ) -> Self {
        Self {
            settings,
            scanner,
            cache: Arc::new(cache),
            cache_config,
            annotations,
            pending_cache_write: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 获取项目列表
    ///
    /// 缓存新鲜且未强制刷新时直接使用缓存；否则重新扫描，并在后台写入缓存。
    /// 两种情况都会与当前的用户标注合并。
    pub async fn list(&self, force_refresh: bool) -> ProjectListing {
        let (cached, persisted) = tokio::join!(self.cached_entry(), self.annotations.load());

        if !force_refresh {
            if let Some(entry) = cached {
                if entry.is_fresh(self.cache_config.max_age()) {
                    tracing::debug!("serving {} projects from cache", entry.projects.len());
                    return ProjectListing {
                        projects: merge_with_persisted(&entry.projects, &persisted),
                        last_scan: entry.captured_at,
                        cached: true,
                    };
                }
            }
        }

        let projects = self.scanner.scan(&self.settings).await;
        let merged = merge_with_persisted(&projects, &persisted);
        self.spawn_cache_write(projects).await;

        ProjectListing {
            projects: merged,
            last_scan: Utc::now(),
            cached: false,
        }
    }

    /// 更新项目标注，ID 必须是由项目路径生成的格式
    pub async fn update_annotation(
        &self,
        id: ProjectId,
        update: AnnotationUpdate,
    ) -> Result<Annotation, CatalogError> {
        if !id.is_well_formed() {
            return Err(CatalogError::UnknownProject(id.to_string()));
        }
        self.annotations.update(id, update).await
    }

    /// 把项目移动到根目录下的 `_Archive` 目录
    ///
    /// 只接受 `<root>/<分类>/<项目>` 这一层的目录。
    pub async fn archive(&self, project_path: &Path) -> Result<PathBuf, CatalogError> {
        let root = ensure_within_root(&self.settings, project_path)?;

        let relative: Vec<_> = project_path
            .strip_prefix(&root)
            .map(|relative| relative.components().collect())
            .unwrap_or_default();

        let already_archived = relative
            .iter()
            .any(|c| c.as_os_str().to_string_lossy().eq_ignore_ascii_case(ARCHIVE_DIR));
        if already_archived {
            return Err(CatalogError::AlreadyArchived(project_path.to_path_buf()));
        }

        let name = match relative.as_slice() {
            [Component::Normal(_), Component::Normal(name)] => *name,
            _ => return Err(CatalogError::NotAProject(project_path.to_path_buf())),
        };

        let archive_dir = root.join(ARCHIVE_DIR);
        tokio::fs::create_dir_all(&archive_dir)
            .await
            .map_err(|err| CatalogError::io(&archive_dir, err))?;

        let destination = archive_dir.join(name);
        if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            return Err(CatalogError::DestinationExists(destination));
        }

        tokio::fs::rename(project_path, &destination)
            .await
            .map_err(|err| CatalogError::io(project_path, err))?;

        self.invalidate_cache().await;
        tracing::info!(
            "archived {} to {}",
            project_path.display(),
            destination.display()
        );
        Ok(destination)
    }

    /// 根目录下的分类名
    pub fn categories(&self) -> Vec<String> {
        let Some(root) = self.settings.root() else {
            return Vec::new();
        };

        match DirectoryWalker::from_settings(&self.settings).categories(root) {
            Ok(categories) => categories,
            Err(err) => {
                tracing::warn!("cannot list categories: {}", err);
                Vec::new()
            }
        }
    }

    /// 丢弃扫描缓存，根目录或忽略列表变化后调用
    pub async fn invalidate_cache(&self) {
        self.wait_for_cache_write().await;
        self.cache.invalidate().await;
    }

    /// 等待最近一次后台缓存写入完成
    pub async fn wait_for_cache_write(&self) {
        let handle = self.pending_cache_write.lock().await.take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                tracing::warn!("scan cache write task failed: {}", err);
            }
        }
    }

    async fn cached_entry(&self) -> Option<ScanCacheEntry> {
        if !self.cache_config.enabled {
            return None;
        }
        self.cache.get().await
    }

    /// 在后台写入缓存，失败只记录日志
    async fn spawn_cache_write(&self, projects: Vec<Project>) {
        if !self.cache_config.enabled {
            return;
        }

        let cache = Arc::clone(&self.cache);
        let handle = tokio::spawn(async move {
            if let Err(err) = cache.put(projects).await {
                tracing::warn!("failed to write scan cache: {:#}", err);
            }
        });

        *self.pending_cache_write.lock().await = Some(handle);
    }
}

use futures::future::join_all;

use crate::config::{ScanConfig, Settings};
use crate::error::WalkError;
use crate::models::Project;
use crate::scanner::file_walker::DirectoryWalker;
use crate::scanner::git_analyzer::{GitAnalyzer, VersionControl};
use crate::scanner::project_probe::ProjectProbe;

/// 项目扫描器 - 枚举候选目录，分批并发探测
#[derive(Debug, Clone)]
pub struct ProjectScanner<V = GitAnalyzer> {
    probe: ProjectProbe<V>,
    batch_size: usize,
}

impl Default for ProjectScanner<GitAnalyzer> {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl ProjectScanner<GitAnalyzer> {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(ProjectProbe::from_config(config), config.batch_size)
    }
}

impl<V: VersionControl> ProjectScanner<V> {
    pub fn new(probe: ProjectProbe<V>, batch_size: usize) -> Self {
        Self {
            probe,
            batch_size: batch_size.max(1),
        }
    }

    /// 扫描根目录下的所有项目
    ///
    /// 根目录未配置或不存在时返回空列表。候选目录按批处理：
    /// 一批内并发探测，整批结束后才开始下一批。结果保持枚举顺序。
    pub async fn scan(&self, settings: &Settings) -> Vec<Project> {
        let Some(root) = settings.root() else {
            tracing::debug!("root path not configured, nothing to scan");
            return Vec::new();
        };

        let walker = DirectoryWalker::from_settings(settings);
        let candidates = match walker.enumerate(root).await {
            Ok(candidates) => candidates,
            Err(WalkError::RootNotFound(path)) => {
                tracing::debug!("root path {} does not exist", path.display());
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!("cannot enumerate projects: {}", err);
                return Vec::new();
            }
        };

        let mut projects = Vec::with_capacity(candidates.len());
        for (index, batch) in candidates.chunks(self.batch_size).enumerate() {
            let results = join_all(
                batch
                    .iter()
                    .map(|candidate| self.probe.build(&candidate.path, &candidate.category)),
            )
            .await;

            let before = projects.len();
            projects.extend(results.into_iter().flatten());
            tracing::debug!(
                "batch {} settled: {}/{} projects probed",
                index + 1,
                projects.len() - before,
                batch.len()
            );
        }

        tracing::info!(
            "scanned {} projects under {}",
            projects.len(),
            root.display()
        );
        projects
    }
}

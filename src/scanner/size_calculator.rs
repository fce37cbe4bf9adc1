use futures::future::join_all;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::defaults::DefaultConfig;

/// 大小估算器 - 只统计目录下第一层的部分文件
///
/// 不递归子目录，最多采样 `sample_files` 个文件。结果只是估算值，
/// 以换取扫描速度。
#[derive(Debug, Clone)]
pub struct SizeEstimator {
    sample_files: usize,
}

impl Default for SizeEstimator {
    fn default() -> Self {
        Self::new(DefaultConfig::default_size_sample_files())
    }
}

impl SizeEstimator {
    pub fn new(sample_files: usize) -> Self {
        Self { sample_files }
    }

    /// 估算目录大小（字节），目录无法读取时返回 0
    pub async fn estimate(&self, dir_path: &Path) -> u64 {
        let files = match self.sample(dir_path).await {
            Ok(files) => files,
            Err(err) => {
                tracing::debug!("cannot list {}: {}", dir_path.display(), err);
                return 0;
            }
        };

        let sizes = join_all(files.iter().map(|file| async move {
            match fs::metadata(file).await {
                Ok(metadata) => metadata.len(),
                Err(_) => 0,
            }
        }))
        .await;

        sizes.into_iter().sum()
    }

    /// 收集最多 `sample_files` 个第一层普通文件
    async fn sample(&self, dir_path: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::with_capacity(self.sample_files);
        let mut entries = fs::read_dir(dir_path).await?;

        while files.len() < self.sample_files {
            let Some(entry) = entries.next_entry().await? else {
                break;
            };

            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => files.push(entry.path()),
                _ => {}
            }
        }

        Ok(files)
    }
}

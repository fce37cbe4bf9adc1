use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use git2::{Repository, StatusOptions};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::defaults::DefaultConfig;
use crate::models::GitInfo;
use crate::scanner::project_detector::file_exists;
use crate::utils::time_format::format_commit_time;

/// 版本控制查询后端
///
/// `query` 是阻塞调用，由 [`VersionControlProbe`] 放到阻塞线程池里执行并加超时。
pub trait VersionControl: Send + Sync + 'static {
    fn query(&self, repo_path: &Path) -> Result<GitInfo>;
}

/// Git 仓库分析器 - 通过 libgit2 提取仓库信息
#[derive(Debug, Clone, Default)]
pub struct GitAnalyzer;

impl GitAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 分析指定路径的 Git 仓库
    ///
    /// 只有仓库打不开才返回错误；单项信息读取失败时该项保持默认值。
    pub fn analyze_repository(&self, repo_path: &Path) -> Result<GitInfo> {
        let repo = Repository::open(repo_path)?;

        let mut git_info = GitInfo::repository_only();

        if let Some((date, message)) = self.get_last_commit_info(&repo) {
            git_info.last_commit_date = Some(date);
            git_info.last_commit_message = Some(message);
        }

        git_info.branch = self.get_current_branch(&repo);

        git_info.has_uncommitted_changes = match self.has_uncommitted_changes(&repo) {
            Ok(dirty) => dirty,
            Err(err) => {
                tracing::debug!("status failed for {}: {}", repo_path.display(), err);
                false
            }
        };

        Ok(git_info)
    }

    /// 获取最后一次提交的时间（`%ci` 格式）和首行信息
    fn get_last_commit_info(&self, repo: &Repository) -> Option<(String, String)> {
        // 新建的空仓库没有 HEAD 提交
        let commit = repo.head().ok()?.peel_to_commit().ok()?;

        let time = commit.time();
        let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
        let datetime: DateTime<FixedOffset> =
            DateTime::from_timestamp(time.seconds(), 0)?.with_timezone(&offset);

        let message = commit.summary().unwrap_or_default().to_string();

        Some((format_commit_time(&datetime), message))
    }

    /// 获取当前分支名，分离 HEAD 时返回 None
    fn get_current_branch(&self, repo: &Repository) -> Option<String> {
        // 直接读取符号引用，这样还没有提交的分支也能拿到名字
        let head = repo.find_reference("HEAD").ok()?;
        head.symbolic_target()?
            .strip_prefix("refs/heads/")
            .map(str::to_string)
    }

    /// 检查是否有未提交的更改（包括未跟踪的文件）
    fn has_uncommitted_changes(&self, repo: &Repository) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(false);

        let statuses = repo.statuses(Some(&mut options))?;
        let dirty = statuses.iter().any(|entry| {
            let status = entry.status();
            !status.is_empty() && !status.is_ignored()
        });

        Ok(dirty)
    }
}

impl VersionControl for GitAnalyzer {
    fn query(&self, repo_path: &Path) -> Result<GitInfo> {
        self.analyze_repository(repo_path)
    }
}

/// 版本控制探测器 - 检测仓库是否存在，并在超时限制内查询详细信息
#[derive(Debug)]
pub struct VersionControlProbe<V = GitAnalyzer> {
    backend: Arc<V>,
    timeout: Duration,
}

impl<V> Clone for VersionControlProbe<V> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            timeout: self.timeout,
        }
    }
}

impl Default for VersionControlProbe<GitAnalyzer> {
    fn default() -> Self {
        Self::new(
            GitAnalyzer::new(),
            Duration::from_secs(DefaultConfig::default_git_timeout_secs()),
        )
    }
}

impl<V: VersionControl> VersionControlProbe<V> {
    pub fn new(backend: V, timeout: Duration) -> Self {
        Self {
            backend: Arc::new(backend),
            timeout,
        }
    }

    /// 探测项目目录的版本控制状态
    ///
    /// 没有 `.git` 时返回默认状态；查询失败或超时返回"有仓库但详情未知"。
    pub async fn probe(&self, path: &Path) -> GitInfo {
        if !file_exists(&path.join(".git")).await {
            return GitInfo::default();
        }

        let backend = Arc::clone(&self.backend);
        let repo_path = path.to_path_buf();
        let query = tokio::task::spawn_blocking(move || backend.query(&repo_path));

        match tokio::time::timeout(self.timeout, query).await {
            Ok(Ok(Ok(info))) => GitInfo {
                has_repo: true,
                ..info
            },
            Ok(Ok(Err(err))) => {
                tracing::debug!("git query failed for {}: {}", path.display(), err);
                GitInfo::repository_only()
            }
            Ok(Err(err)) => {
                tracing::warn!("git query task failed for {}: {}", path.display(), err);
                GitInfo::repository_only()
            }
            Err(_) => {
                // 超时的查询任务被放弃，只影响这一个项目
                tracing::warn!(
                    "git query timed out after {:?} for {}",
                    self.timeout,
                    path.display()
                );
                GitInfo::repository_only()
            }
        }
    }
}

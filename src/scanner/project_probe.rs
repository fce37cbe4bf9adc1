use chrono::{DateTime, Utc};
use std::path::Path;

use crate::config::ScanConfig;
use crate::models::{Project, ProjectId};
use crate::scanner::git_analyzer::{GitAnalyzer, VersionControl, VersionControlProbe};
use crate::scanner::project_detector::{file_exists, TechStackDetector, MANIFEST_FILE};
use crate::scanner::size_calculator::SizeEstimator;

/// 项目探测器 - 组合各个探测项，生成单个项目记录
#[derive(Debug)]
pub struct ProjectProbe<V = GitAnalyzer> {
    tech_stack: TechStackDetector,
    version_control: VersionControlProbe<V>,
    size: SizeEstimator,
}

impl<V> Clone for ProjectProbe<V> {
    fn clone(&self) -> Self {
        Self {
            tech_stack: self.tech_stack.clone(),
            version_control: self.version_control.clone(),
            size: self.size.clone(),
        }
    }
}

impl Default for ProjectProbe<GitAnalyzer> {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl ProjectProbe<GitAnalyzer> {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            VersionControlProbe::new(GitAnalyzer::new(), config.git_timeout()),
            SizeEstimator::new(config.size_sample_files),
        )
    }
}

impl<V: VersionControl> ProjectProbe<V> {
    pub fn new(version_control: VersionControlProbe<V>, size: SizeEstimator) -> Self {
        Self {
            tech_stack: TechStackDetector::new(),
            version_control,
            size,
        }
    }

    /// 探测一个项目目录
    ///
    /// 各探测项并发执行。目录本身 stat 失败（例如扫描过程中被删除）时返回 None。
    pub async fn build(&self, path: &Path, category: &str) -> Option<Project> {
        let manifest = path.join(MANIFEST_FILE);
        let (metadata, has_package_json, tech_stack, git, size_bytes) = tokio::join!(
            tokio::fs::metadata(path),
            file_exists(&manifest),
            self.tech_stack.detect(path),
            self.version_control.probe(path),
            self.size.estimate(path),
        );

        let metadata = match metadata {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::debug!("dropping {}: {}", path.display(), err);
                return None;
            }
        };

        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Some(Project {
            id: ProjectId::from_path(path),
            name,
            path: path.to_path_buf(),
            category: category.to_string(),
            tech_stack,
            has_package_json,
            git,
            size_bytes,
            last_modified,
            is_focus: false,
            is_favorite: false,
            notes: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GitInfo, TechStack};
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_build_project_record() {
        let temp_dir = tempdir().unwrap();
        let project_dir = temp_dir.path().join("budget-app");
        fs::create_dir(&project_dir).unwrap();
        let manifest = r#"{"dependencies":{"react":"^18.2.0"}}"#;
        fs::write(project_dir.join("package.json"), manifest).unwrap();

        let project = ProjectProbe::default()
            .build(&project_dir, "Finance")
            .await
            .unwrap();

        assert_eq!(project.id, ProjectId::from_path(&project_dir));
        assert_eq!(project.name, "budget-app");
        assert_eq!(project.category, "Finance");
        assert_eq!(project.path, project_dir);
        assert_eq!(project.tech_stack, TechStack::React);
        assert!(project.has_package_json);
        assert_eq!(project.git, GitInfo::default());
        assert_eq!(project.size_bytes, manifest.len() as u64);
        assert!(project.last_modified > DateTime::<Utc>::UNIX_EPOCH);
        assert!(!project.is_focus);
        assert!(!project.is_favorite);
        assert!(project.notes.is_empty());
    }

    #[tokio::test]
    async fn test_vanished_directory_is_dropped() {
        let temp_dir = tempdir().unwrap();
        let gone = temp_dir.path().join("deleted-mid-scan");

        assert!(ProjectProbe::default().build(&gone, "Misc").await.is_none());
    }
}

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::Settings;
use crate::error::WalkError;

/// 目录遍历器 - 枚举 根目录 → 分类 → 项目 两级目录
#[derive(Debug, Clone, Default)]
pub struct DirectoryWalker {
    /// 在两级目录中都会被跳过的目录名
    ignored: BTreeSet<String>,
}

/// 待探测的项目目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// 项目路径
    pub path: PathBuf,

    /// 所属分类
    pub category: String,
}

impl DirectoryWalker {
    pub fn new(ignored: BTreeSet<String>) -> Self {
        Self { ignored }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.ignored_folders.clone())
    }

    /// 枚举根目录下的所有候选项目
    ///
    /// 遍历在阻塞线程池中执行。顺序按文件名排序，对同一文件系统快照是稳定的。
    pub async fn enumerate(&self, root: &Path) -> Result<Vec<Candidate>, WalkError> {
        let walker = self.clone();
        let root_buf = root.to_path_buf();

        tokio::task::spawn_blocking(move || walker.enumerate_blocking(&root_buf))
            .await
            .map_err(|err| WalkError::Io {
                path: root.to_path_buf(),
                source: io::Error::other(err),
            })?
    }

    /// 同步版本的 [`enumerate`](Self::enumerate)
    pub fn enumerate_blocking(&self, root: &Path) -> Result<Vec<Candidate>, WalkError> {
        ensure_root(root)?;

        let mut candidates = Vec::new();
        for entry in self.walk(root, 2) {
            match entry {
                Ok(entry) if entry.depth() == 2 => {
                    let category = entry
                        .path()
                        .parent()
                        .and_then(Path::file_name)
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();

                    candidates.push(Candidate {
                        path: entry.into_path(),
                        category,
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    // 根目录本身无法读取才算失败，分类目录读取失败只跳过
                    if err.depth() == 0 {
                        return Err(walk_io_error(root, &err));
                    }
                    tracing::warn!("skipping unreadable directory: {}", err);
                }
            }
        }

        tracing::debug!(
            "enumerated {} candidate projects under {}",
            candidates.len(),
            root.display()
        );
        Ok(candidates)
    }

    /// 列出根目录下的分类名
    pub fn categories(&self, root: &Path) -> Result<Vec<String>, WalkError> {
        ensure_root(root)?;

        let mut categories = Vec::new();
        for entry in self.walk(root, 1) {
            match entry {
                Ok(entry) if entry.depth() == 1 => {
                    categories.push(entry.file_name().to_string_lossy().into_owned());
                }
                Ok(_) => {}
                Err(err) => return Err(walk_io_error(root, &err)),
            }
        }
        Ok(categories)
    }

    fn walk(
        &self,
        root: &Path,
        max_depth: usize,
    ) -> impl Iterator<Item = walkdir::Result<DirEntry>> + '_ {
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| self.should_visit(entry))
    }

    /// 检查是否应该进入指定条目
    fn should_visit(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        if !entry.file_type().is_dir() {
            return false;
        }

        match entry.file_name().to_str() {
            Some(name) => !self.ignored.contains(name),
            None => true,
        }
    }
}

fn ensure_root(root: &Path) -> Result<(), WalkError> {
    match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(WalkError::RootNotFound(root.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(WalkError::RootNotFound(root.to_path_buf()))
        }
        Err(err) => Err(WalkError::Io {
            path: root.to_path_buf(),
            source: err,
        }),
    }
}

fn walk_io_error(root: &Path, err: &walkdir::Error) -> WalkError {
    let kind = err
        .io_error()
        .map(io::Error::kind)
        .unwrap_or(io::ErrorKind::Other);

    WalkError::Io {
        path: err.path().unwrap_or(root).to_path_buf(),
        source: io::Error::new(kind, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn ignored(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_enumerate_two_levels() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("Finance").join("budget-app")).unwrap();
        fs::create_dir_all(root.join("Finance").join("tax-tool")).unwrap();
        fs::create_dir_all(root.join("DevTools").join("cli-tool").join("src")).unwrap();
        fs::write(root.join("README.md"), "top level file").unwrap();
        fs::write(root.join("Finance").join("notes.txt"), "category file").unwrap();

        let walker = DirectoryWalker::default();
        let candidates = walker.enumerate(root).await.unwrap();

        assert_eq!(
            candidates,
            vec![
                Candidate {
                    path: root.join("DevTools").join("cli-tool"),
                    category: "DevTools".to_string(),
                },
                Candidate {
                    path: root.join("Finance").join("budget-app"),
                    category: "Finance".to_string(),
                },
                Candidate {
                    path: root.join("Finance").join("tax-tool"),
                    category: "Finance".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_ignored_names_skipped_at_both_levels() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("node_modules").join("left-pad")).unwrap();
        fs::create_dir_all(root.join("Web").join("node_modules")).unwrap();
        fs::create_dir_all(root.join("Web").join("site")).unwrap();

        let walker = DirectoryWalker::new(ignored(&["node_modules"]));
        let candidates = walker.enumerate_blocking(root).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, root.join("Web").join("site"));
        assert!(candidates
            .iter()
            .all(|c| c.category != "node_modules" && !c.path.ends_with("node_modules")));
    }

    #[test]
    fn test_root_name_in_ignore_list_is_still_walked() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("dist");
        fs::create_dir_all(root.join("Apps").join("one")).unwrap();

        let walker = DirectoryWalker::new(ignored(&["dist"]));
        let candidates = walker.enumerate_blocking(&root).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_missing_root_is_root_not_found() {
        let temp_dir = tempdir().unwrap();
        let walker = DirectoryWalker::default();

        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            walker.enumerate_blocking(&missing),
            Err(WalkError::RootNotFound(_))
        ));

        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "not a directory").unwrap();
        assert!(matches!(
            walker.enumerate_blocking(&file),
            Err(WalkError::RootNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_skipped() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("root");
        let outside = temp_dir.path().join("outside");
        fs::create_dir_all(root.join("Cat").join("real")).unwrap();
        fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("Cat").join("linked")).unwrap();

        let candidates = DirectoryWalker::default().enumerate_blocking(&root).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, root.join("Cat").join("real"));
    }

    #[test]
    fn test_categories() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("Finance")).unwrap();
        fs::create_dir_all(root.join("DevTools")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();

        let walker = DirectoryWalker::new(ignored(&[".git"]));
        assert_eq!(
            walker.categories(root).unwrap(),
            vec!["DevTools".to_string(), "Finance".to_string()]
        );
    }
}

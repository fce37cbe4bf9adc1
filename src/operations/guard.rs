use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::error::CatalogError;

/// 确认路径位于已配置的根目录之内，返回根目录
pub fn ensure_within_root(settings: &Settings, path: &Path) -> Result<PathBuf, CatalogError> {
    let root = settings.root().ok_or(CatalogError::RootNotConfigured)?;

    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(CatalogError::OutsideRoot(path.to_path_buf()));
    }

    let normalized_root = normalize(root);
    let normalized_path = normalize(path);
    let root_prefix = format!("{}/", normalized_root.trim_end_matches('/'));

    if normalized_path == normalized_root || normalized_path.starts_with(&root_prefix) {
        Ok(root.to_path_buf())
    } else {
        Err(CatalogError::OutsideRoot(path.to_path_buf()))
    }
}

/// 统一分隔符；Windows 下路径不区分大小写
fn normalize(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    if cfg!(windows) {
        normalized.to_lowercase()
    } else {
        normalized
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::defaults::DefaultConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据目录（标注和扫描缓存），为空时使用系统数据目录
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// 用户设置
    pub settings: Settings,

    /// 扫描配置
    pub scan: ScanConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 显示配置
    pub display: DisplayConfig,
}

/// 用户设置，扫描器只关心根目录和忽略列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// 项目根目录，为空表示尚未配置
    pub root_path: String,

    /// 在两级目录中都会被跳过的目录名
    pub ignored_folders: BTreeSet<String>,

    /// 使用的编辑器
    pub editor: Editor,

    /// 打开项目时的默认操作
    pub default_action: DefaultAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Editor {
    #[default]
    Vscode,
    Cursor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DefaultAction {
    #[default]
    Editor,
    Explorer,
    Terminal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 每批并发探测的项目数
    pub batch_size: usize,

    /// Git 查询超时（秒）
    pub git_timeout_secs: u64,

    /// 大小估算时最多采样的文件数
    pub size_sample_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 是否启用扫描缓存
    pub enabled: bool,

    /// 缓存有效期（秒）
    pub max_age_secs: u64,

    /// 是否把缓存写入磁盘，供下次启动使用
    pub persist: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 默认排序字段
    pub default_sort: SortField,

    /// 时间格式
    pub time_format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum SortField {
    Name,
    LastModified,
    LastCommit,
    Size,
    Category,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            settings: Settings::default(),
            scan: ScanConfig::default(),
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_path: String::new(),
            ignored_folders: DefaultConfig::default_ignored_folders(),
            editor: Editor::default(),
            default_action: DefaultAction::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: DefaultConfig::default_batch_size(),
            git_timeout_secs: DefaultConfig::default_git_timeout_secs(),
            size_sample_files: DefaultConfig::default_size_sample_files(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_secs: DefaultConfig::default_cache_max_age_secs(),
            persist: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_sort: SortField::LastModified,
            time_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl Settings {
    /// 已配置的根目录，未配置时返回 None
    pub fn root(&self) -> Option<&Path> {
        let trimmed = self.root_path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Path::new(trimmed))
        }
    }
}

impl ScanConfig {
    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs)
    }
}

impl CacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("unable to locate the user config directory"))?;
        path.push("project-catalog");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载配置，如果文件不存在则创建默认配置
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            let config = Self::default();
            config.save_to_file(path)?;
            Ok(config)
        }
    }

    /// 数据目录
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(DefaultConfig::default_data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_unconfigured() {
        let settings = Settings::default();
        assert!(settings.root().is_none());
        assert!(settings.ignored_folders.contains("node_modules"));
        assert!(settings.ignored_folders.contains(".git"));
        assert_eq!(settings.editor, Editor::Vscode);
        assert_eq!(settings.default_action, DefaultAction::Editor);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.root_path = "/srv/projects".to_string();
        config.settings.ignored_folders.insert("_Archive".to_string());
        config.settings.editor = Editor::Cursor;
        config.scan.batch_size = 4;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.settings, config.settings);
        assert_eq!(loaded.scan.batch_size, 4);
        assert_eq!(loaded.cache.max_age(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[settings]
rootPath = "/work"
"#,
        )
        .unwrap();

        assert_eq!(config.settings.root(), Some(Path::new("/work")));
        assert!(config.settings.ignored_folders.contains("dist"));
        assert_eq!(config.scan.batch_size, 10);
        assert_eq!(config.scan.git_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert!(config.settings.root().is_none());
    }
}

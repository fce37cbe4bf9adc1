use std::collections::BTreeSet;
use std::path::PathBuf;

pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认忽略的目录名
    pub fn default_ignored_folders() -> BTreeSet<String> {
        ["node_modules", ".git", ".next", "dist"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// 默认每批并发探测的项目数
    pub fn default_batch_size() -> usize {
        10
    }

    /// 默认 Git 查询超时（秒）
    pub fn default_git_timeout_secs() -> u64 {
        5
    }

    /// 默认大小估算时采样的文件数
    pub fn default_size_sample_files() -> usize {
        20
    }

    /// 默认扫描缓存有效期（秒）
    pub fn default_cache_max_age_secs() -> u64 {
        5 * 60
    }

    /// 默认数据目录（标注和扫描缓存）
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".local").join("share")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("project-catalog")
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Project;

/// 一次完整扫描的缓存条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanCacheEntry {
    /// 扫描得到的项目（不含用户标注）
    pub projects: Vec<Project>,

    /// 扫描完成时间，序列化为毫秒时间戳
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub captured_at: DateTime<Utc>,
}

/// 返回给调用方的项目列表
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListing {
    /// 合并了用户标注的项目列表
    pub projects: Vec<Project>,

    /// 数据对应的扫描时间
    pub last_scan: DateTime<Utc>,

    /// 是否来自缓存
    pub cached: bool,
}

impl ScanCacheEntry {
    /// 时间戳截断到毫秒，与文件中的精度一致
    pub fn new(projects: Vec<Project>) -> Self {
        let now = Utc::now();
        Self {
            projects,
            captured_at: DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now),
        }
    }

    /// 缓存的年龄，时钟回拨时视为 0
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.captured_at)
            .to_std()
            .unwrap_or_default()
    }

    /// 是否仍在新鲜度窗口内
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.age() < max_age
    }
}

impl ProjectListing {
    /// 按条件过滤项目
    pub fn filter_projects<F>(&self, predicate: F) -> Vec<&Project>
    where
        F: Fn(&Project) -> bool,
    {
        self.projects.iter().filter(|p| predicate(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_and_stale_entries() {
        let fresh = ScanCacheEntry::new(Vec::new());
        assert!(fresh.is_fresh(Duration::from_secs(300)));

        let stale = ScanCacheEntry {
            projects: Vec::new(),
            captured_at: Utc::now() - chrono::Duration::minutes(6),
        };
        assert!(!stale.is_fresh(Duration::from_secs(300)));
    }

    #[test]
    fn test_new_entry_survives_json_round_trip() {
        let entry = ScanCacheEntry::new(Vec::new());
        assert_eq!(entry.captured_at.timestamp_subsec_nanos() % 1_000_000, 0);

        let json = serde_json::to_string(&entry).unwrap();
        let restored: ScanCacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, entry);
    }

    #[test]
    fn test_entry_serializes_timestamp_in_millis() {
        let entry = ScanCacheEntry {
            projects: Vec::new(),
            captured_at: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000_123i64);
        assert!(json["projects"].as_array().unwrap().is_empty());
    }
}

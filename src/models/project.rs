use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::time_format::parse_commit_time;

/// 项目唯一标识
///
/// 由项目绝对路径的字节做 URL 安全的 base64 编码（无填充）得到，
/// 可以直接作为 JSON 对象的键或 URL 路径段使用。
/// 目录被重命名后 ID 随之改变，之前的标注会变成孤儿数据。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// 从项目路径生成 ID
    pub fn from_path(path: &Path) -> Self {
        Self(URL_SAFE_NO_PAD.encode(path.as_os_str().as_encoded_bytes()))
    }

    /// 是否是由路径生成的合法 ID
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && URL_SAFE_NO_PAD.decode(&self.0).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn serialize_path_lossy<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&path.to_string_lossy())
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// 扫描得到的项目记录
///
/// 字段名（camelCase）是与展示层之间的公共约定，不要随意修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// 项目 ID
    pub id: ProjectId,

    /// 项目名称（路径最后一段）
    pub name: String,

    /// 项目路径，非 UTF-8 字节序列化时替换为 U+FFFD
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,

    /// 所属分类（根目录下的一级目录名）
    pub category: String,

    /// 技术栈
    pub tech_stack: TechStack,

    /// 是否存在 package.json
    pub has_package_json: bool,

    /// Git 信息
    pub git: GitInfo,

    /// 估算的大小（字节）
    pub size_bytes: u64,

    /// 最后修改时间
    pub last_modified: DateTime<Utc>,

    /// 用户标记：当前关注
    pub is_focus: bool,

    /// 用户标记：收藏
    pub is_favorite: bool,

    /// 用户备注
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechStack {
    NextJs,
    React,
    Vite,
    Vue,
    Python,
    Node,
    Unknown,
}

/// 版本控制状态，没有仓库时所有字段都是默认值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
    /// 是否存在 Git 仓库
    pub has_repo: bool,

    /// 最后提交时间，git `%ci` 格式的原始字符串
    pub last_commit_date: Option<String>,

    /// 最后提交信息（首行）
    pub last_commit_message: Option<String>,

    /// 是否有未提交的更改
    pub has_uncommitted_changes: bool,

    /// 当前分支
    pub branch: Option<String>,
}

impl GitInfo {
    /// 仓库存在但无法读取详细信息
    pub fn repository_only() -> Self {
        Self {
            has_repo: true,
            ..Self::default()
        }
    }

    /// 解析后的最后提交时间，无法解析时返回 None
    pub fn last_commit_time(&self) -> Option<DateTime<Utc>> {
        self.last_commit_date.as_deref().and_then(parse_commit_time)
    }
}

impl Project {
    /// 检查是否有未提交的更改
    pub fn has_uncommitted_changes(&self) -> bool {
        self.git.has_repo && self.git.has_uncommitted_changes
    }

    /// 获取技术栈的显示名称
    pub fn type_display_name(&self) -> &'static str {
        self.tech_stack.display_name()
    }
}

impl TechStack {
    pub fn display_name(&self) -> &'static str {
        match self {
            TechStack::NextJs => "Next.js",
            TechStack::React => "React",
            TechStack::Vite => "Vite",
            TechStack::Vue => "Vue",
            TechStack::Python => "Python",
            TechStack::Node => "Node.js",
            TechStack::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_is_stable_and_url_safe() {
        let path = Path::new("/home/dev/Projects/Finance/budget-app");
        let a = ProjectId::from_path(path);
        let b = ProjectId::from_path(path);

        assert_eq!(a, b);
        assert!(a
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(a.is_well_formed());
        assert!(!ProjectId::from("").is_well_formed());
        assert!(!ProjectId::from("not an id!").is_well_formed());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_serializes_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/root/Cat").join(OsStr::from_bytes(b"bad\xff"));
        let project = Project {
            id: ProjectId::from_path(&path),
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            path: path.clone(),
            category: "Cat".to_string(),
            tech_stack: TechStack::Unknown,
            has_package_json: false,
            git: GitInfo::default(),
            size_bytes: 0,
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
            is_focus: false,
            is_favorite: false,
            notes: String::new(),
        };

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["path"], "/root/Cat/bad\u{fffd}");
        assert!(project.id.is_well_formed());
    }

    #[test]
    fn test_project_id_differs_for_distinct_paths() {
        let a = ProjectId::from_path(Path::new("/root/a/b"));
        let b = ProjectId::from_path(Path::new("/root/a/c"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_project_serializes_with_public_field_names() {
        let project = Project {
            id: ProjectId::from("abc"),
            name: "budget-app".to_string(),
            path: PathBuf::from("/root/Finance/budget-app"),
            category: "Finance".to_string(),
            tech_stack: TechStack::NextJs,
            has_package_json: true,
            git: GitInfo::default(),
            size_bytes: 42,
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
            is_focus: false,
            is_favorite: true,
            notes: String::new(),
        };

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["techStack"], "nextjs");
        assert_eq!(json["hasPackageJson"], true);
        assert_eq!(json["sizeBytes"], 42);
        assert_eq!(json["isFavorite"], true);
        assert_eq!(json["git"]["hasRepo"], false);
        assert!(json["git"]["lastCommitDate"].is_null());
        assert!(json.get("lastModified").is_some());
    }

    #[test]
    fn test_unparseable_commit_date_is_unknown() {
        let git = GitInfo {
            has_repo: true,
            last_commit_date: Some("not a date".to_string()),
            ..GitInfo::default()
        };
        assert!(git.last_commit_time().is_none());
    }
}

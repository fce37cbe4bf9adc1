use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::models::TechStack;

/// 项目清单文件
pub const MANIFEST_FILE: &str = "package.json";

/// Python 依赖文件
pub const PYTHON_REQUIREMENTS_FILE: &str = "requirements.txt";

/// 按优先级排列的框架依赖，第一个命中的生效
const FRAMEWORK_PRECEDENCE: [(&str, TechStack); 4] = [
    ("next", TechStack::NextJs),
    ("vite", TechStack::Vite),
    ("vue", TechStack::Vue),
    ("react", TechStack::React),
];

/// 技术栈检测器 - 根据 package.json 的依赖判断项目技术栈
#[derive(Debug, Clone, Default)]
pub struct TechStackDetector;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default)]
    dependencies: Option<HashMap<String, serde_json::Value>>,

    #[serde(default)]
    dev_dependencies: Option<HashMap<String, serde_json::Value>>,
}

impl TechStackDetector {
    pub fn new() -> Self {
        Self
    }

    /// 检测指定项目目录的技术栈
    pub async fn detect(&self, path: &Path) -> TechStack {
        let manifest_path = path.join(MANIFEST_FILE);

        if !file_exists(&manifest_path).await {
            if file_exists(&path.join(PYTHON_REQUIREMENTS_FILE)).await {
                return TechStack::Python;
            }
            return TechStack::Unknown;
        }

        let content = match tokio::fs::read_to_string(&manifest_path).await {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!("cannot read {}: {}", manifest_path.display(), err);
                return TechStack::Unknown;
            }
        };

        match serde_json::from_str::<PackageManifest>(&content) {
            Ok(manifest) => Self::classify(&manifest),
            Err(err) => {
                tracing::debug!("invalid manifest {}: {}", manifest_path.display(), err);
                TechStack::Unknown
            }
        }
    }

    fn classify(manifest: &PackageManifest) -> TechStack {
        let declares = |name: &str| {
            manifest
                .dependencies
                .as_ref()
                .is_some_and(|deps| deps.contains_key(name))
                || manifest
                    .dev_dependencies
                    .as_ref()
                    .is_some_and(|deps| deps.contains_key(name))
        };

        FRAMEWORK_PRECEDENCE
            .iter()
            .find(|(dependency, _)| declares(dependency))
            .map(|(_, stack)| *stack)
            .unwrap_or(TechStack::Node)
    }
}

/// 检查路径是否存在，任何错误都视为不存在
pub(crate) async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

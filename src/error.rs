use std::path::PathBuf;
use thiserror::Error;

/// 枚举根目录时的错误
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 用户主动发起的操作（标注、归档、打开）的错误
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("root path is not configured")]
    RootNotConfigured,

    #[error("path is outside the configured root: {0}")]
    OutsideRoot(PathBuf),

    #[error("project is already archived: {0}")]
    AlreadyArchived(PathBuf),

    #[error("not a project directory (expected <root>/<category>/<project>): {0}")]
    NotAProject(PathBuf),

    #[error("archive destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("unknown project: {0}")]
    UnknownProject(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

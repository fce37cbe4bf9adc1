use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::CatalogError;
use crate::models::{Annotation, AnnotationUpdate, PersistedAnnotations, ProjectId};

/// 用户标注存储，保存为 JSON 文件
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    path: PathBuf,
}

impl AnnotationStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载标注，文件缺失或损坏时返回空数据
    pub async fn load(&self) -> PersistedAnnotations {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("cannot read annotations {}: {}", self.path.display(), err);
                }
                return PersistedAnnotations::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(persisted) => persisted,
            Err(err) => {
                tracing::warn!("ignoring corrupt annotations {}: {}", self.path.display(), err);
                PersistedAnnotations::default()
            }
        }
    }

    /// 保存标注
    pub async fn save(&self, persisted: &PersistedAnnotations) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(persisted)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| CatalogError::io(parent, err))?;
        }

        fs::write(&self.path, content)
            .await
            .map_err(|err| CatalogError::io(&self.path, err))
    }

    /// 更新单个项目的标注，未提供的字段保持原值
    pub async fn update(
        &self,
        id: ProjectId,
        update: AnnotationUpdate,
    ) -> Result<Annotation, CatalogError> {
        let mut persisted = self.load().await;
        let annotation = persisted.apply(id, update);
        self.save(&persisted).await?;
        Ok(annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp_dir = tempdir().unwrap();
        let store = AnnotationStore::new(temp_dir.path().join("projects.json"));
        assert_eq!(store.load().await, PersistedAnnotations::default());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("projects.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let store = AnnotationStore::new(path);
        assert!(store.load().await.projects.is_empty());
    }

    #[tokio::test]
    async fn test_update_persists_partial_changes() {
        let temp_dir = tempdir().unwrap();
        let store = AnnotationStore::new(temp_dir.path().join("data").join("projects.json"));
        let id = ProjectId::from("abc");

        store
            .update(
                id.clone(),
                AnnotationUpdate {
                    notes: Some("needs tests".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let annotation = store
            .update(
                id.clone(),
                AnnotationUpdate {
                    is_favorite: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(annotation.is_favorite);
        assert_eq!(annotation.notes, "needs tests");

        let reloaded = AnnotationStore::new(store.path().to_path_buf()).load().await;
        assert_eq!(reloaded.get(&id), Some(&annotation));
    }
}

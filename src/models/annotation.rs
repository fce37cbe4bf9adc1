use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::ProjectId;

/// 用户对单个项目的标注
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub is_focus: bool,
    pub is_favorite: bool,
    pub notes: String,
}

/// 持久化的标注数据，以项目 ID 为键
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAnnotations {
    /// 项目标注
    #[serde(default)]
    pub projects: HashMap<ProjectId, Annotation>,

    /// 最后一次扫描时间
    #[serde(default)]
    pub last_scan: String,
}

/// 标注的部分更新，未提供的字段保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationUpdate {
    pub is_focus: Option<bool>,
    pub is_favorite: Option<bool>,
    pub notes: Option<String>,
}

impl PersistedAnnotations {
    pub fn get(&self, id: &ProjectId) -> Option<&Annotation> {
        self.projects.get(id)
    }

    /// 应用一次部分更新，返回更新后的标注
    pub fn apply(&mut self, id: ProjectId, update: AnnotationUpdate) -> Annotation {
        let entry = self.projects.entry(id).or_default();

        if let Some(is_focus) = update.is_focus {
            entry.is_focus = is_focus;
        }
        if let Some(is_favorite) = update.is_favorite {
            entry.is_favorite = is_favorite;
        }
        if let Some(notes) = update.notes {
            entry.notes = notes;
        }

        entry.clone()
    }
}

impl AnnotationUpdate {
    pub fn is_empty(&self) -> bool {
        self.is_focus.is_none() && self.is_favorite.is_none() && self.notes.is_none()
    }
}

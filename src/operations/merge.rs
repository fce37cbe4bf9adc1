use crate::models::{PersistedAnnotations, Project};

/// 把持久化的用户标注合并到扫描结果中
///
/// 生成新的记录，不修改输入。没有对应扫描记录的标注不会出现在结果里，
/// 也不会从存储中删除。
pub fn merge_with_persisted(
    projects: &[Project],
    persisted: &PersistedAnnotations,
) -> Vec<Project> {
    projects
        .iter()
        .map(|project| match persisted.get(&project.id) {
            Some(annotation) => Project {
                is_focus: annotation.is_focus,
                is_favorite: annotation.is_favorite,
                notes: annotation.notes.clone(),
                ..project.clone()
            },
            None => project.clone(),
        })
        .collect()
}

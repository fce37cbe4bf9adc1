use std::cmp::Ordering;

use project_catalog::config::SortField;
use project_catalog::models::{Project, ProjectListing};
use project_catalog::utils::{format_relative_time, format_size, format_time};

/// 按指定字段排序
///
/// 名称和分类升序，时间和大小降序。无法解析的提交时间排在最后。
pub fn sort_projects(projects: &mut [Project], field: SortField) {
    match field {
        SortField::Name => projects.sort_by(compare_names),
        SortField::LastModified => projects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified)),
        SortField::LastCommit => projects.sort_by(|a, b| {
            match (a.git.last_commit_time(), b.git.last_commit_time()) {
                (Some(a_time), Some(b_time)) => b_time.cmp(&a_time),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => compare_names(a, b),
            }
        }),
        SortField::Size => projects.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes)),
        SortField::Category => projects.sort_by(|a, b| {
            a.category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then_with(|| compare_names(a, b))
        }),
    }
}

fn compare_names(a: &Project, b: &Project) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

/// 表格输出
pub fn print_table(listing: &ProjectListing, projects: &[Project], time_format: &str) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }

    println!(
        "{:<2} {:<28} {:<16} {:<8} {:<20} {:<12} {:>10}",
        "", "NAME", "CATEGORY", "STACK", "BRANCH", "COMMITTED", "SIZE"
    );

    for project in projects {
        let flags = format!(
            "{}{}",
            if project.is_favorite { "*" } else { " " },
            if project.is_focus { "!" } else { " " }
        );

        let branch = if project.git.has_repo {
            let name = project.git.branch.as_deref().unwrap_or("-");
            if project.has_uncommitted_changes() {
                format!("{} (dirty)", name)
            } else {
                name.to_string()
            }
        } else {
            "-".to_string()
        };

        let committed = project
            .git
            .last_commit_time()
            .map(|t| format_relative_time(&t))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<2} {:<28} {:<16} {:<8} {:<20} {:<12} {:>10}",
            flags,
            truncate(&project.name, 28),
            truncate(&project.category, 16),
            project.type_display_name(),
            truncate(&branch, 20),
            committed,
            format_size(project.size_bytes),
        );

        if !project.notes.is_empty() {
            println!("{:<3}  {}", "", truncate(&project.notes, 80));
        }
    }

    println!();
    println!(
        "{} projects, scanned {}{}",
        projects.len(),
        format_time(&listing.last_scan, time_format),
        if listing.cached { " (cached)" } else { "" }
    );
}

/// JSON 输出，字段与项目记录保持一致
pub fn print_json(listing: &ProjectListing, projects: Vec<Project>) -> anyhow::Result<()> {
    let view = ProjectListing {
        projects,
        last_scan: listing.last_scan,
        cached: listing.cached,
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut truncated: String = value.chars().take(max.saturating_sub(1)).collect();
        truncated.push('~');
        truncated
    }
}

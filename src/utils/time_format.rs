use chrono::{DateTime, FixedOffset, Local, Utc};

/// git `%ci` 输出使用的时间格式
pub const COMMIT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// 按 git `%ci` 格式输出提交时间
pub fn format_commit_time(time: &DateTime<FixedOffset>) -> String {
    time.format(COMMIT_TIME_FORMAT).to_string()
}

/// 解析提交时间字符串，无法解析时返回 None（视为未知）
pub fn parse_commit_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_str(value, COMMIT_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// 格式化时间为本地时间
pub fn format_time(time: &DateTime<Utc>, pattern: &str) -> String {
    time.with_timezone(&Local).format(pattern).to_string()
}

/// 格式化相对时间 (例如: "2 days ago")
pub fn format_relative_time(time: &DateTime<Utc>) -> String {
    format_relative_time_from(time, &Utc::now())
}

fn format_relative_time_from(time: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(*time).num_seconds();
    if seconds < 0 {
        return "in the future".to_string();
    }

    match seconds {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", seconds / 60),
        3600..=86399 => format!("{}h ago", seconds / 3600),
        86400..=2591999 => format!("{}d ago", seconds / 86400),
        2592000..=31535999 => format!("{}mo ago", seconds / 2592000),
        _ => format!("{}y ago", seconds / 31536000),
    }
}

/// 格式化字节大小
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

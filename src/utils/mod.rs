pub mod time_format;

pub use time_format::{format_relative_time, format_size, format_time, parse_commit_time};

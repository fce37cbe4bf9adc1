pub mod config;
pub mod error;
pub mod models;
pub mod operations;
pub mod scanner;
pub mod utils;

// 重新导出常用模块
pub use config::{Config, Settings};
pub use error::{CatalogError, WalkError};
pub use models::{Project, ProjectId, TechStack};
pub use operations::ProjectManager;
pub use scanner::ProjectScanner;

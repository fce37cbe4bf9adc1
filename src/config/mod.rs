pub mod defaults;
pub mod settings;

pub use settings::{
    CacheConfig, Config, DefaultAction, DisplayConfig, Editor, ScanConfig, Settings, SortField,
};

pub mod file_walker;
pub mod git_analyzer;
pub mod project_detector;
pub mod project_probe;
pub mod project_scanner;
pub mod scan_cache;
pub mod size_calculator;

pub use file_walker::{Candidate, DirectoryWalker};
pub use git_analyzer::{GitAnalyzer, VersionControl, VersionControlProbe};
pub use project_detector::TechStackDetector;
pub use project_probe::ProjectProbe;
pub use project_scanner::ProjectScanner;
pub use scan_cache::ScanCache;
pub use size_calculator::SizeEstimator;

pub mod annotation;
pub mod project;
pub mod scan_result;

pub use annotation::{Annotation, AnnotationUpdate, PersistedAnnotations};
pub use project::{GitInfo, Project, ProjectId, TechStack};
pub use scan_result::{ProjectListing, ScanCacheEntry};

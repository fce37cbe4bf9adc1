pub mod annotations;
pub mod guard;
pub mod launcher;
pub mod merge;
pub mod project_manager;

pub use annotations::AnnotationStore;
pub use launcher::{Launcher, OpenTarget};
pub use merge::merge_with_persisted;
pub use project_manager::ProjectManager;

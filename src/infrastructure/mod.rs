//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod editor;
pub mod repository;

pub use config::Settings;
pub use editor::{EditorSession, NavigationSink};
pub use repository::{FileSystemRepository, TimelineRepository};

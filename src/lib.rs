//! mtimeline - Milestone timelines from markdown notes
//!
//! Extracts dated milestones from a folder of markdown documents. Dates are
//! recognized in front-matter fields, inline prose, `[[YYYY-MM-DD]]` links and
//! `#date/` / `#year/` tags, in English, Spanish, French and Japanese, and
//! merged into one chronological timeline.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::TimelineError;

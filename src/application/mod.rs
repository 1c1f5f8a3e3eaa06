//! Application layer - Use cases and orchestration

pub mod build_timeline;
pub mod find_years;
pub mod init;
pub mod manage_config;
pub mod open_milestone;
pub mod tag_year;

pub use build_timeline::{BuiltTimeline, TimelineOptions, TimelineService};
pub use find_years::find_years;
pub use manage_config::ConfigService;
pub use open_milestone::open_milestone;
pub use tag_year::tag_year;

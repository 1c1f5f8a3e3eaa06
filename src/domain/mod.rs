//! Domain layer - Date recognition, milestones and aggregation

pub mod aggregator;
pub mod date_token;
pub mod document;
pub mod locale;
pub mod milestone;
pub mod scanners;
pub mod year_refs;

pub use aggregator::{aggregate, DocumentProvider, ScanSettings, SortOrder, TimelineReport};
pub use date_token::{parse_token, OrderPreference, ParsedDate, Precision, TokenKind};
pub use document::{Document, DocumentHandle};
pub use locale::{Language, LocaleData};
pub use milestone::{Milestone, Notation};
pub use year_refs::YearMatch;

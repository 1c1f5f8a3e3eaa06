//! Potential year references use case

use crate::domain::year_refs::find_potential_years;
use crate::domain::YearMatch;
use crate::error::Result;
use crate::infrastructure::{FileSystemRepository, TimelineRepository};

/// Untagged four-digit years across every document under the root
pub fn find_years(repository: &FileSystemRepository) -> Result<Vec<YearMatch>> {
    let settings = repository.load_settings()?;
    let documents = repository.read_all()?;
    Ok(find_potential_years(&documents, settings.language))
}

//! Open a milestone's source use case

use crate::domain::DocumentHandle;
use crate::error::{Result, TimelineError};
use crate::infrastructure::{FileSystemRepository, NavigationSink};
use std::fs;
use std::path::PathBuf;

/// Hand a document address to the navigation sink after checking it exists
pub fn open_milestone(
    repository: &FileSystemRepository,
    sink: &dyn NavigationSink,
    file: &str,
    line_number: Option<usize>,
) -> Result<PathBuf> {
    let handle = DocumentHandle::new(file.replace('\\', "/"));
    let path = repository.path_of(&handle);

    let text = fs::read_to_string(&path).map_err(|source| TimelineError::DocumentRead {
        document: handle.to_string(),
        source,
    })?;

    if let Some(line) = line_number {
        let total = text.lines().count();
        if line == 0 || line > total {
            return Err(TimelineError::Config(format!(
                "Line {} is outside {} ({} lines)",
                line, handle, total
            )));
        }
    }

    sink.navigate(&path, line_number)?;
    Ok(path)
}

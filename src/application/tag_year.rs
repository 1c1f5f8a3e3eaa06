//! Year tag write-back use case

use crate::domain::aggregator::DocumentProvider;
use crate::domain::year_refs::{insert_year_tag, MAX_YEAR, MIN_YEAR};
use crate::domain::DocumentHandle;
use crate::error::{Result, TimelineError};
use crate::infrastructure::FileSystemRepository;
use tracing::info;

/// Tag the first untagged `year` on `line_number` of `file` with `#year/<year>`.
/// Returns the rewritten line.
pub fn tag_year(
    repository: &FileSystemRepository,
    file: &str,
    line_number: usize,
    year: u32,
) -> Result<String> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(TimelineError::Config(format!(
            "Year {} is outside {}..={}",
            year, MIN_YEAR, MAX_YEAR
        )));
    }

    let handle = DocumentHandle::new(file.replace('\\', "/"));
    let document = repository.read(&handle)?;

    let rewritten = insert_year_tag(&document.text, line_number, year).ok_or_else(|| {
        TimelineError::Config(format!(
            "No untagged {} on line {} of {}",
            year, line_number, handle
        ))
    })?;

    repository.write_note_atomic(&handle, &rewritten)?;
    info!(document = %handle, line = line_number, year, "year tag inserted");

    Ok(rewritten
        .lines()
        .nth(line_number - 1)
        .unwrap_or_default()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::init::init;
    use std::fs;
    use tempfile::TempDir;

    fn repo(content: &str) -> (TempDir, FileSystemRepository) {
        let temp = TempDir::new().unwrap();
        init(temp.path()).unwrap();
        fs::write(temp.path().join("book.md"), content).unwrap();
        let repo = FileSystemRepository::new(temp.path().to_path_buf());
        (temp, repo)
    }

    #[test]
    fn test_tag_year_rewrites_file() {
        let (temp, repo) = repo("# Book\nPublished in 1809.\n");

        let line = tag_year(&repo, "book.md", 2, 1809).unwrap();

        assert_eq!(line, "Published in 1809 #year/1809.");
        assert_eq!(
            fs::read_to_string(temp.path().join("book.md")).unwrap(),
            "# Book\nPublished in 1809 #year/1809.\n"
        );
    }

    #[test]
    fn test_tag_year_missing_year_leaves_file() {
        let (temp, repo) = repo("Published in 1809\n");

        assert!(tag_year(&repo, "book.md", 1, 1810).is_err());
        assert!(tag_year(&repo, "book.md", 7, 1809).is_err());
        assert!(tag_year(&repo, "book.md", 1, 3000).is_err());
        assert_eq!(
            fs::read_to_string(temp.path().join("book.md")).unwrap(),
            "Published in 1809\n"
        );
    }

    #[test]
    fn test_tag_year_missing_file() {
        let (_temp, repo) = repo("x\n");
        assert!(matches!(
            tag_year(&repo, "gone.md", 1, 1809),
            Err(TimelineError::DocumentRead { .. })
        ));
    }
}

//! Detection of dates that are part of image file names
//!
//! `Screenshot 2024-03-15 at 10.21.33.png` and `IMG_20240315_1021.jpg` carry
//! capture timestamps, not milestones.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

const IMAGE_EXTENSIONS: &str = r"png|jpe?g|gif|webp|bmp|heic|tiff?|avif";

/// File names without whitespace that embed a date-like digit run
fn compact_filename_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)[^\s\[\]()|]*\d{{4}}[-_.]?\d{{1,2}}[-_.]?\d{{1,2}}[^\s\[\]()|]*\.(?:{})\b",
            IMAGE_EXTENSIONS
        ))
        .expect("valid screenshot pattern")
    })
}

/// Names that start with "Screenshot" and may contain spaces but never a
/// sentence break
fn screenshot_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)screen[\s_-]?shot(?:[^\[\]()|.,;!?]|[.,][^\s\[\]()|])*?\.(?:{})\b",
            IMAGE_EXTENSIONS
        ))
        .expect("valid screenshot pattern")
    })
}

/// Byte ranges of image file names on a line
pub fn filename_ranges(line: &str) -> Vec<Range<usize>> {
    compact_filename_regex()
        .find_iter(line)
        .chain(screenshot_name_regex().find_iter(line))
        .map(|m| m.range())
        .collect()
}

/// Whether a matched date span sits inside an image file name
pub fn is_screenshot_span(line: &str, span: &Range<usize>) -> bool {
    filename_ranges(line)
        .iter()
        .any(|r| r.start <= span.start && span.end <= r.end)
}

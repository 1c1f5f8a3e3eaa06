//! Markdown documents: front matter, body lines and heading outline

use super::date_token::OrderPreference;
use super::locale::Language;
use crate::error::{Result, TimelineError};
use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Per-document order override key
pub const DATE_FORMAT_KEY: &str = "dateFormat";
/// Explicit uncertainty annotation key
pub const DATE_UNCERTAIN_KEY: &str = "dateUncertain";
/// Per-document language override key
pub const LANGUAGE_KEY: &str = "language";

/// Opaque address of a document: its path relative to the collection root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentHandle(String);

impl DocumentHandle {
    pub fn new(path: impl Into<String>) -> Self {
        DocumentHandle(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name without directory or `.md` extension
    pub fn name(&self) -> &str {
        Path::new(&self.0)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A snapshot of one document as read from the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub handle: DocumentHandle,
    /// Full text, front matter included
    pub text: String,
    /// Front-matter scalars, already unquoted
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(handle: DocumentHandle, text: String, metadata: BTreeMap<String, String>) -> Self {
        Document {
            handle,
            text,
            metadata,
        }
    }

    /// Build a document by splitting and parsing its own front matter
    pub fn from_markdown(handle: DocumentHandle, text: String) -> Result<Self> {
        let metadata = match split_frontmatter(&text) {
            Some((yaml, _)) => parse_metadata(yaml)?,
            None => BTreeMap::new(),
        };
        Ok(Document::new(handle, text, metadata))
    }

    /// 0-based index of the first line after the front matter
    pub fn body_start_line(&self) -> usize {
        split_frontmatter(&self.text).map_or(0, |(_, start)| start)
    }

    /// Body lines paired with their 1-based line numbers in the full text
    pub fn body_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        let start = self.body_start_line();
        self.text
            .lines()
            .enumerate()
            .skip(start)
            .map(|(idx, line)| (idx + 1, line))
    }

    /// Nearest-heading lookup for the body
    pub fn outline(&self) -> Outline {
        let start = self.body_start_line();
        let body = self.text.lines().skip(start).collect::<Vec<_>>().join("\n");
        Outline::from_markdown(&body, start)
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// `dateFormat` override, ignored when unrecognized
    pub fn order_override(&self) -> Option<OrderPreference> {
        self.metadata_value(DATE_FORMAT_KEY)
            .and_then(|v| OrderPreference::from_str(v).ok())
    }

    /// `dateUncertain: true`
    pub fn is_explicitly_uncertain(&self) -> bool {
        self.metadata_value(DATE_UNCERTAIN_KEY).is_some_and(|v| {
            matches!(v.trim().to_lowercase().as_str(), "true" | "yes" | "1")
        })
    }

    /// `language` override; an unsupported code is an error for this document
    pub fn language_override(&self) -> Result<Option<Language>> {
        self.metadata_value(LANGUAGE_KEY)
            .map(Language::from_str)
            .transpose()
    }
}

/// Split a leading `---` block; returns the YAML text and the 0-based
/// index of the first body line
pub fn split_frontmatter(text: &str) -> Option<(&str, usize)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for (idx, line) in lines.enumerate() {
        if line.trim_end() == "---" || line.trim_end() == "..." {
            return Some((&text[yaml_start..offset], idx + 2));
        }
        offset += line.len();
    }
    None
}

/// Parse a front-matter block into string scalars
///
/// Sequences and nested mappings are skipped. An empty block is an empty map.
pub fn parse_metadata(yaml: &str) -> Result<BTreeMap<String, String>> {
    let mut metadata = BTreeMap::new();
    if yaml.trim().is_empty() {
        return Ok(metadata);
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| TimelineError::Metadata(e.to_string()))?;
    let serde_yaml::Value::Mapping(mapping) = value else {
        return Err(TimelineError::Metadata(
            "front matter is not a key/value mapping".to_string(),
        ));
    };

    for (key, value) in mapping {
        let Some(key) = scalar_to_string(&key) else {
            continue;
        };
        if let Some(value) = scalar_to_string(&value) {
            metadata.insert(key, value);
        }
    }

    Ok(metadata)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.trim().to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

fn inline_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"#[\w/-]+").expect("valid tag pattern"))
}

/// Section headings of a document, keyed by 0-based line index
#[derive(Debug, Clone, Default)]
pub struct Outline {
    headings: Vec<(usize, String)>,
}

impl Outline {
    /// Collect ATX and setext headings; `line_offset` shifts body-relative
    /// lines back to full-text lines
    pub fn from_markdown(body: &str, line_offset: usize) -> Self {
        let line_starts: Vec<usize> = std::iter::once(0)
            .chain(body.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        let line_of = |offset: usize| match line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };

        let mut headings = Vec::new();
        let mut current: Option<(usize, String)> = None;

        for (event, range) in MdParser::new(body).into_offset_iter() {
            match event {
                Event::Start(Tag::Heading { .. }) => {
                    current = Some((line_of(range.start) + line_offset, String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((line, text)) = current.take() {
                        let cleaned = inline_tag_regex().replace_all(&text, "");
                        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
                        if !cleaned.is_empty() {
                            headings.push((line, cleaned));
                        }
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, heading)) = current.as_mut() {
                        heading.push_str(&text);
                    }
                }
                _ => {}
            }
        }

        Outline { headings }
    }

    /// Nearest heading at or above the given 0-based line
    pub fn heading_at(&self, line_idx: usize) -> Option<&str> {
        self.headings
            .iter()
            .take_while(|(line, _)| *line <= line_idx)
            .last()
            .map(|(_, heading)| heading.as_str())
    }
}

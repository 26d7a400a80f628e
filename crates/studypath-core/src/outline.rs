//! Chapter ranges from a document outline
//!
//! Document readers hand over a flattened outline: one entry per bookmark,
//! in document order, each with the 0-based page it starts on. A chapter
//! runs until the page before the next entry starts. Documents without an
//! outline are split into fixed-size sections instead.

use serde::{Deserialize, Serialize};

use crate::Chapter;

/// Pages per section when a document has no outline
pub const DEFAULT_SECTION_PAGES: u32 = 15;

const UNTITLED: &str = "Untitled";

/// One flattened outline (bookmark) entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub title: String,
    /// Nesting depth (1 = top level)
    #[serde(default = "default_level")]
    pub level: u32,
    /// 0-based index of the page the entry points at
    pub page_index: u32,
}

fn default_level() -> u32 {
    1
}

impl OutlineEntry {
    pub fn new(title: impl Into<String>, level: u32, page_index: u32) -> Self {
        Self {
            title: title.into(),
            level,
            page_index,
        }
    }
}

/// Derive chapters from outline entries.
///
/// Entry `i` ends at `max(start_i, start_{i+1} - 1)`; the last entry ends at
/// `max(start, total_pages - 1)`. Returned page numbers are 1-based.
pub fn chapters_from_outline(entries: &[OutlineEntry], total_pages: u32) -> Vec<Chapter> {
    let last_index = total_pages.saturating_sub(1);

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let start = entry.page_index;
            let end = match entries.get(idx + 1) {
                Some(next) => start.max(next.page_index.saturating_sub(1)),
                None => start.max(last_index),
            };

            let title = entry.title.trim();
            let title = if title.is_empty() { UNTITLED } else { title };

            Chapter::new(title, start.saturating_add(1), end.saturating_add(1))
        })
        .collect()
}

/// Split a document into `Section N` chunks of `chunk_size` pages.
///
/// The final section is clipped to `total_pages`. A zero chunk size is
/// treated as one page per section.
pub fn fixed_sections(total_pages: u32, chunk_size: u32) -> Vec<Chapter> {
    let chunk_size = chunk_size.max(1);
    let count = total_pages.div_ceil(chunk_size);

    (0..count)
        .map(|i| {
            let start = i.saturating_mul(chunk_size).saturating_add(1);
            let end = (i + 1).saturating_mul(chunk_size).min(total_pages);
            Chapter::new(format!("Section {}", i + 1), start, end)
        })
        .collect()
}

/// Use the outline when there is one, otherwise fall back to fixed sections
pub fn outline_or_sections(entries: &[OutlineEntry], total_pages: u32) -> Vec<Chapter> {
    if entries.is_empty() {
        fixed_sections(total_pages, DEFAULT_SECTION_PAGES)
    } else {
        chapters_from_outline(entries, total_pages)
    }
}

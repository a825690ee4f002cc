//! Bookmarked pages of an open text.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Characters of page text kept in a bookmark.
pub const SNIPPET_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageBookmark {
    /// Zero-based page index at the time the bookmark was taken.
    pub page: usize,
    pub title: String,
    pub snippet: String,
}

impl PageBookmark {
    /// Bookmark `page` of `source_title`, keeping the head of `page_text`.
    pub fn for_page(source_title: &str, page: usize, page_text: &str) -> Self {
        let source_title = if source_title.trim().is_empty() {
            "Untitled"
        } else {
            source_title
        };
        Self {
            page,
            title: format!("{source_title} - Page {}", page + 1),
            snippet: page_text.chars().take(SNIPPET_CHARS).collect(),
        }
    }

    /// Page this bookmark points at in a sequence of `total_pages` pages.
    pub fn clamped_page(&self, total_pages: usize) -> usize {
        self.page.min(total_pages.saturating_sub(1))
    }
}

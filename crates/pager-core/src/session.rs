use crate::{
    bookmark::PageBookmark,
    config,
    pagination::{self, LayoutMetrics},
    progress::ReadingProgress,
    text_utils,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ReaderSnapshot {
    pub source_name: String,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_text: String,
    pub page_word_count: usize,
    pub font_size: u32,
    pub line_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub progress_pct: f64,
    pub is_bookmarked: bool,
    pub bookmark_count: usize,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(tag = "command", rename_all = "snake_case")]
#[ts(export)]
pub enum SessionCommand {
    GetSnapshot,
    NextPage,
    PrevPage,
    SetPage {
        page: usize,
    },
    IncreaseFont,
    DecreaseFont,
    SetTypography {
        font_size: u32,
        line_height: Option<f32>,
    },
    Resize {
        width: f32,
        height: f32,
    },
    ToggleBookmark,
    GoToBookmark {
        index: usize,
    },
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "reader_get_snapshot",
            Self::NextPage => "reader_next_page",
            Self::PrevPage => "reader_prev_page",
            Self::SetPage { .. } => "reader_set_page",
            Self::IncreaseFont => "reader_increase_font",
            Self::DecreaseFont => "reader_decrease_font",
            Self::SetTypography { .. } => "reader_set_typography",
            Self::Resize { .. } => "reader_resize",
            Self::ToggleBookmark => "reader_toggle_bookmark",
            Self::GoToBookmark { .. } => "reader_go_to_bookmark",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub action: &'static str,
    pub snapshot: ReaderSnapshot,
}

/// One open text: its pages at the current metrics and the page being read.
#[derive(Debug, Clone)]
pub struct ReaderSession {
    source_name: String,
    full_text: String,
    /// Whitespace-collapsed text; page starts are byte offsets into it.
    normalized_text: String,
    pub config: config::AppConfig,
    metrics: LayoutMetrics,
    pages: Vec<String>,
    page_word_counts: Vec<usize>,
    page_starts: Vec<usize>,
    bookmarks: Vec<PageBookmark>,
    pub current_page: usize,
}

impl ReaderSession {
    pub fn new(
        source_name: impl Into<String>,
        full_text: String,
        mut config: config::AppConfig,
        progress: Option<ReadingProgress>,
    ) -> Self {
        // Cached overrides may carry values from older bounds.
        config.font_size = config.clamp_font_size(config.font_size);
        if config.line_height.is_nan() || config.line_height <= 0.0 {
            config.line_height = config.line_height_for(config.font_size);
        }

        let mut session = Self {
            source_name: source_name.into(),
            normalized_text: text_utils::normalize_whitespace(&full_text),
            full_text,
            metrics: config.metrics(),
            config,
            pages: Vec::new(),
            page_word_counts: Vec::new(),
            page_starts: Vec::new(),
            bookmarks: Vec::new(),
            current_page: 0,
        };
        session.repaginate(None);
        if let Some(progress) = progress {
            session.current_page = progress.clamped_position(session.page_count());
        }
        session
    }

    /// Read plain text from `source_path` and open it.
    pub fn load(
        source_path: &Path,
        config: config::AppConfig,
        progress: Option<ReadingProgress>,
    ) -> Result<Self> {
        let text = fs::read_to_string(source_path)
            .with_context(|| format!("failed to read {}", source_path.display()))?;
        let source_name = source_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("text")
            .to_string();
        info!(
            source = %source_name,
            bytes = text.len(),
            "Loaded source text"
        );
        Ok(Self::new(source_name, text, config, progress))
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn bookmarks(&self) -> &[PageBookmark] {
        &self.bookmarks
    }

    /// Replace the bookmark list, e.g. with one restored from a cache.
    /// Entries pointing at the same page are kept once.
    pub fn restore_bookmarks(&mut self, bookmarks: Vec<PageBookmark>) {
        self.bookmarks.clear();
        for bookmark in bookmarks {
            if !self.bookmarks.iter().any(|kept| kept.page == bookmark.page) {
                self.bookmarks.push(bookmark);
            }
        }
    }

    pub fn current_page_text(&self) -> &str {
        self.pages
            .get(self.current_page)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        ReaderSnapshot {
            source_name: self.source_name.clone(),
            current_page: self.current_page,
            total_pages: self.pages.len(),
            page_text: self.current_page_text().to_string(),
            page_word_count: self
                .page_word_counts
                .get(self.current_page)
                .copied()
                .unwrap_or(0),
            font_size: self.config.font_size,
            line_height: self.config.line_height,
            viewport_width: self.metrics.viewport_width,
            viewport_height: self.metrics.viewport_height,
            progress_pct: self.to_progress().percent(),
            is_bookmarked: self.is_bookmarked(),
            bookmark_count: self.bookmarks.len(),
        }
    }

    pub fn apply_command(&mut self, command: SessionCommand) -> SessionEvent {
        let action = command.action();
        match command {
            SessionCommand::GetSnapshot => {}
            SessionCommand::NextPage => self.next_page(),
            SessionCommand::PrevPage => self.prev_page(),
            SessionCommand::SetPage { page } => self.set_page(page),
            SessionCommand::IncreaseFont => self.increase_font(),
            SessionCommand::DecreaseFont => self.decrease_font(),
            SessionCommand::SetTypography {
                font_size,
                line_height,
            } => self.set_typography(font_size, line_height),
            SessionCommand::Resize { width, height } => self.resize_viewport(width, height),
            SessionCommand::ToggleBookmark => {
                self.toggle_bookmark();
            }
            SessionCommand::GoToBookmark { index } => self.go_to_bookmark(index),
        }
        SessionEvent {
            action,
            snapshot: self.snapshot(),
        }
    }

    pub fn next_page(&mut self) {
        if self.current_page + 1 >= self.pages.len() {
            return;
        }
        self.current_page += 1;
    }

    pub fn prev_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1);
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.min(self.pages.len().saturating_sub(1));
    }

    pub fn increase_font(&mut self) {
        self.adjust_font_size(i64::from(self.config.font_size_step));
    }

    pub fn decrease_font(&mut self) {
        self.adjust_font_size(-i64::from(self.config.font_size_step));
    }

    /// Change the font size by `delta` within the configured bounds. The line
    /// height follows the font size through `line_height_ratio`.
    pub fn adjust_font_size(&mut self, delta: i64) {
        let requested = i64::from(self.config.font_size)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        let font_size = self.config.clamp_font_size(requested as u32);
        if font_size == self.config.font_size {
            return;
        }
        let line_height = self.config.line_height_for(font_size);
        self.apply_typography(font_size, line_height);
    }

    /// Set explicit typography. A missing or non-positive line height is
    /// derived from the font size.
    pub fn set_typography(&mut self, font_size: u32, line_height: Option<f32>) {
        let font_size = self.config.clamp_font_size(font_size);
        let line_height = line_height
            .filter(|height| *height > 0.0)
            .unwrap_or_else(|| self.config.line_height_for(font_size));
        if font_size == self.config.font_size && line_height == self.config.line_height {
            return;
        }
        self.apply_typography(font_size, line_height);
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        if width == self.metrics.viewport_width && height == self.metrics.viewport_height {
            return;
        }
        let anchor = self.current_page_anchor();
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self.metrics = self.config.metrics();
        self.repaginate(anchor);
    }

    /// Whether a bookmark points at the current page. Bookmarks past the end
    /// of a shorter page sequence count for the last page.
    pub fn is_bookmarked(&self) -> bool {
        self.bookmark_position().is_some()
    }

    /// Bookmark the current page, or remove its bookmark if it has one.
    /// Returns whether the page is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self) -> bool {
        if self.pages.is_empty() {
            return false;
        }
        if let Some(idx) = self.bookmark_position() {
            let removed = self.bookmarks.remove(idx);
            debug!(page = removed.page, "Removed bookmark");
            return false;
        }
        let bookmark =
            PageBookmark::for_page(&self.source_name, self.current_page, self.current_page_text());
        debug!(page = bookmark.page, title = %bookmark.title, "Added bookmark");
        self.bookmarks.push(bookmark);
        true
    }

    /// Jump to the page of the bookmark at `index`. Unknown indices are
    /// ignored.
    pub fn go_to_bookmark(&mut self, index: usize) {
        if let Some(bookmark) = self.bookmarks.get(index) {
            self.current_page = bookmark.clamped_page(self.pages.len());
        }
    }

    pub fn to_progress(&self) -> ReadingProgress {
        ReadingProgress::now(self.current_page, self.pages.len())
    }

    fn bookmark_position(&self) -> Option<usize> {
        if self.pages.is_empty() {
            return None;
        }
        let total = self.pages.len();
        self.bookmarks
            .iter()
            .position(|bookmark| bookmark.clamped_page(total) == self.current_page)
    }

    fn apply_typography(&mut self, font_size: u32, line_height: f32) {
        let anchor = self.current_page_anchor();
        self.config.font_size = font_size;
        self.config.line_height = line_height;
        self.metrics = self.config.metrics();
        self.repaginate(anchor);
    }

    /// Rebuild the whole page sequence from the current metrics. With an
    /// anchor (a byte offset into the normalized text), the page holding it
    /// becomes current; otherwise the current index is clamped into the new
    /// range.
    fn repaginate(&mut self, anchor: Option<usize>) {
        self.pages = pagination::paginate_with(&self.full_text, &self.metrics, &self.config.layout);
        self.page_word_counts = self
            .pages
            .iter()
            .map(|page| text_utils::word_count(page))
            .collect();
        self.page_starts = page_starts(&self.normalized_text, &self.pages);

        self.current_page = match anchor {
            Some(offset) => self.page_idx_for_offset(offset),
            None => self.current_page.min(self.pages.len().saturating_sub(1)),
        };
        debug!(
            pages = self.pages.len(),
            current_page = self.current_page,
            font_size = self.config.font_size,
            line_height = self.config.line_height,
            "Repaginated session"
        );
    }

    fn current_page_anchor(&self) -> Option<usize> {
        self.page_starts.get(self.current_page).copied()
    }

    fn page_idx_for_offset(&self, offset: usize) -> usize {
        self.page_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1)
    }
}

/// Byte offset of each page in `normalized`. Pages are consecutive slices of
/// it separated by at most one space. A page that cannot be located (the
/// single unnormalized fallback page) starts where the previous one ended.
fn page_starts(normalized: &str, pages: &[String]) -> Vec<usize> {
    let mut pos = 0usize;
    pages
        .iter()
        .map(|page| {
            let start = normalized
                .get(pos..)
                .and_then(|rest| rest.find(page.as_str()))
                .map_or(pos, |found| pos + found);
            pos = start + page.len();
            start
        })
        .collect()
}

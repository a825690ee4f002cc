//! Pagination utilities.
//!
//! There is no text-layout engine at this level, so page size is estimated:
//! the usable viewport area is divided by an average glyph width and the line
//! height to get a character budget per page. The text is then reflowed as one
//! continuous stream of words and cut at the last space that fits each budget.
//! The function is pure and never fails; degenerate metrics produce either no
//! pages or a single page holding the whole text.

use crate::text_utils::normalize_whitespace;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

/// Viewport and typography a page sequence is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LayoutMetrics {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub font_size: f32,
    pub line_height: f32,
}

impl LayoutMetrics {
    pub fn new(font_size: f32, line_height: f32, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
            font_size,
            line_height,
        }
    }
}

/// Calibration of the capacity estimate.
///
/// `average_char_width_ratio` is the mean glyph advance relative to the font
/// size for the body font in use. The chrome allowances are the space taken
/// by padding and margins around the text block on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaginationConfig {
    #[serde(default = "crate::config::defaults::default_average_char_width_ratio")]
    pub average_char_width_ratio: f32,
    #[serde(default = "crate::config::defaults::default_horizontal_chrome")]
    pub horizontal_chrome: f32,
    #[serde(default = "crate::config::defaults::default_vertical_chrome")]
    pub vertical_chrome: f32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            average_char_width_ratio: crate::config::defaults::default_average_char_width_ratio(),
            horizontal_chrome: crate::config::defaults::default_horizontal_chrome(),
            vertical_chrome: crate::config::defaults::default_vertical_chrome(),
        }
    }
}

/// Estimated number of characters that fit on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCapacity {
    pub chars_per_line: i64,
    pub lines_per_page: i64,
    /// Zero whenever either factor is non-positive.
    pub chars_per_page: i64,
}

impl PageCapacity {
    pub fn is_degenerate(&self) -> bool {
        self.chars_per_page <= 0
    }
}

/// Split `text` into pages using the default calibration.
pub fn paginate(
    text: &str,
    font_size: f32,
    line_height: f32,
    viewport_width: f32,
    viewport_height: f32,
) -> Vec<String> {
    paginate_with(
        text,
        &LayoutMetrics::new(font_size, line_height, viewport_width, viewport_height),
        &PaginationConfig::default(),
    )
}

/// Split `text` into pages sized for `metrics`.
pub fn paginate_with(text: &str, metrics: &LayoutMetrics, config: &PaginationConfig) -> Vec<String> {
    if text.trim().is_empty() || !is_positive(metrics.font_size) || !is_positive(metrics.line_height)
    {
        return Vec::new();
    }

    let capacity = page_capacity(metrics, config);
    if capacity.is_degenerate() {
        warn!(
            chars_per_line = capacity.chars_per_line,
            lines_per_page = capacity.lines_per_page,
            font_size = metrics.font_size,
            viewport_width = metrics.viewport_width,
            viewport_height = metrics.viewport_height,
            "No characters fit on a page; returning the text as a single page"
        );
        return vec![text.trim().to_string()];
    }
    let chars_per_page = usize::try_from(capacity.chars_per_page).unwrap_or(usize::MAX);

    let normalized = normalize_whitespace(text);
    let mut pages = Vec::new();
    let mut rest = normalized.as_str();
    while !rest.is_empty() {
        let split = split_point(rest, chars_per_page);
        let (page, tail) = rest.split_at(split);
        let page = page.trim();
        if !page.is_empty() {
            pages.push(page.to_string());
        }
        rest = tail.trim_start();
    }

    debug!(
        pages = pages.len(),
        chars_per_page,
        font_size = metrics.font_size,
        line_height = metrics.line_height,
        "Paginated text"
    );
    pages
}

/// Estimate the page capacity for the given metrics.
pub fn page_capacity(metrics: &LayoutMetrics, config: &PaginationConfig) -> PageCapacity {
    let usable_width = metrics.viewport_width - config.horizontal_chrome;
    let usable_height = metrics.viewport_height - config.vertical_chrome;

    let chars_per_line =
        floor_to_count(usable_width / (metrics.font_size * config.average_char_width_ratio));
    let lines_per_page = floor_to_count(usable_height / metrics.line_height);
    let chars_per_page = if chars_per_line <= 0 || lines_per_page <= 0 {
        0
    } else {
        chars_per_line.saturating_mul(lines_per_page)
    };

    PageCapacity {
        chars_per_line,
        lines_per_page,
        chars_per_page,
    }
}

/// False for zero, negatives and NaN.
fn is_positive(value: f32) -> bool {
    value > 0.0
}

fn floor_to_count(value: f32) -> i64 {
    if value.is_nan() {
        return 0;
    }
    // Float-to-int casts saturate, so infinities map to the i64 bounds.
    value.floor() as i64
}

/// Byte offset where the next page ends in `rest`.
///
/// `rest` never starts with whitespace. When more than `chars_per_page`
/// characters remain, the cut goes at the last space at or before the
/// boundary character; without one the word is broken at the boundary.
fn split_point(rest: &str, chars_per_page: usize) -> usize {
    let Some((boundary, boundary_char)) = rest.char_indices().nth(chars_per_page) else {
        return rest.len();
    };
    let window = &rest[..boundary + boundary_char.len_utf8()];
    match window.rfind(' ') {
        Some(space) if space > 0 => space,
        _ => boundary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_utils::word_count;

    const QUICK_FOX: &str = "The quick brown fox jumps over the lazy dog";

    fn tight_config() -> PaginationConfig {
        PaginationConfig {
            average_char_width_ratio: 0.5,
            horizontal_chrome: 0.0,
            vertical_chrome: 0.0,
        }
    }

    /// 40 characters per line, 5 lines: 200 characters per page.
    fn two_hundred_char_metrics() -> LayoutMetrics {
        LayoutMetrics::new(10.0, 10.0, 200.0, 50.0)
    }

    fn sample_prose(sentences: usize) -> String {
        let mut text = String::new();
        for idx in 0..sentences {
            text.push_str(&format!(
                "Sentence number {idx} wanders across the page,\nthen rests for a while.   "
            ));
            if idx % 7 == 0 {
                text.push_str("\n\n");
            }
        }
        text
    }

    #[test]
    fn quick_fox_fits_on_one_page() {
        let metrics = LayoutMetrics::new(16.0, 22.0, 375.0, 600.0);
        let capacity = page_capacity(&metrics, &PaginationConfig::default());
        assert_eq!(capacity.chars_per_line, 34);
        assert_eq!(capacity.lines_per_page, 16);
        assert_eq!(capacity.chars_per_page, 544);

        let pages = paginate(QUICK_FOX, 16.0, 22.0, 375.0, 600.0);
        assert_eq!(pages, vec![QUICK_FOX.to_string()]);
    }

    #[test]
    fn empty_text_or_non_positive_typography_yields_no_pages() {
        assert!(paginate("", 16.0, 22.0, 375.0, 600.0).is_empty());
        assert!(paginate("  \n\t ", 16.0, 22.0, 375.0, 600.0).is_empty());
        assert!(paginate(QUICK_FOX, 0.0, 22.0, 375.0, 600.0).is_empty());
        assert!(paginate(QUICK_FOX, 16.0, 0.0, 375.0, 600.0).is_empty());
        assert!(paginate(QUICK_FOX, -4.0, 22.0, 375.0, 600.0).is_empty());
        assert!(paginate(QUICK_FOX, f32::NAN, 22.0, 375.0, 600.0).is_empty());
    }

    #[test]
    fn degenerate_capacity_returns_single_trimmed_page() {
        assert_eq!(
            paginate("hello world", 10000.0, 22.0, 10.0, 10.0),
            vec!["hello world".to_string()]
        );
        assert_eq!(
            paginate("  hello\nworld  ", 16.0, 22.0, 375.0, 200.0),
            vec!["hello\nworld".to_string()]
        );
    }

    #[test]
    fn repeated_calls_are_identical() {
        let text = sample_prose(120);
        let metrics = LayoutMetrics::new(18.0, 28.0, 390.0, 844.0);
        let config = PaginationConfig::default();
        assert_eq!(
            paginate_with(&text, &metrics, &config),
            paginate_with(&text, &metrics, &config)
        );
    }

    #[test]
    fn pages_preserve_every_word_in_order() {
        let text = sample_prose(200);
        for font_size in [12.0, 16.0, 22.0, 32.0] {
            let pages = paginate(&text, font_size, font_size * 1.6, 375.0, 812.0);
            assert!(pages.len() > 1, "expected several pages at {font_size}");
            assert!(pages.iter().all(|page| !page.trim().is_empty()));
            assert_eq!(pages.join(" "), normalize_whitespace(&text));
            let words: usize = pages.iter().map(|page| word_count(page)).sum();
            assert_eq!(words, word_count(&text));
        }
    }

    #[test]
    fn larger_fonts_never_produce_fewer_pages() {
        let text = sample_prose(300);
        let mut previous = 0;
        for font_size in (10..=40).step_by(2) {
            let pages = paginate(&text, font_size as f32, 22.0, 375.0, 812.0);
            assert!(
                pages.len() >= previous,
                "font {font_size} produced {} pages after {previous}",
                pages.len()
            );
            previous = pages.len();
        }
    }

    #[test]
    fn multi_page_split_respects_capacity_and_word_boundaries() {
        let text = vec!["lorem"; 2000].join(" ");
        let config = tight_config();
        let metrics = two_hundred_char_metrics();
        assert_eq!(page_capacity(&metrics, &config).chars_per_page, 200);

        let pages = paginate_with(&text, &metrics, &config);
        let expected = text.chars().count().div_ceil(200);
        assert!(
            (expected - 1..=expected + 1).contains(&pages.len()),
            "expected about {expected} pages, got {}",
            pages.len()
        );
        assert!(pages.iter().all(|page| page.chars().count() <= 200));
        assert!(pages.iter().all(|page| page.split(' ').all(|word| word == "lorem")));
    }

    #[test]
    fn window_ending_on_a_word_boundary_keeps_full_length() {
        // 4 chars per page; "defg" is followed directly by a space.
        let config = tight_config();
        let metrics = LayoutMetrics::new(10.0, 10.0, 20.0, 10.0);
        assert_eq!(page_capacity(&metrics, &config).chars_per_page, 4);

        let pages = paginate_with("abc defg hij", &metrics, &config);
        assert_eq!(pages, vec!["abc", "defg", "hij"]);
    }

    #[test]
    fn text_without_spaces_is_broken_at_capacity() {
        let token = "x".repeat(450);
        let pages = paginate_with(&token, &two_hundred_char_metrics(), &tight_config());
        let lengths: Vec<usize> = pages.iter().map(|page| page.len()).collect();
        assert_eq!(lengths, vec![200, 200, 50]);
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let text = vec!["љубов"; 300].join(" ");
        let pages = paginate_with(&text, &two_hundred_char_metrics(), &tight_config());
        assert!(pages.len() > 1);
        assert!(pages.iter().all(|page| page.chars().count() <= 200));
        assert_eq!(pages.join(" "), text);
    }

    #[test]
    fn concurrent_calls_do_not_interfere() {
        let text = sample_prose(150);
        let font_sizes = [12.0_f32, 16.0, 20.0, 24.0, 28.0];
        let sequential: Vec<Vec<String>> = font_sizes
            .iter()
            .map(|size| paginate(&text, *size, size * 1.6, 375.0, 812.0))
            .collect();

        let parallel: Vec<Vec<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = font_sizes
                .iter()
                .map(|size| {
                    let text = &text;
                    scope.spawn(move || paginate(text, *size, size * 1.6, 375.0, 812.0))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("pagination thread panicked"))
                .collect()
        });

        assert_eq!(sequential, parallel);
    }
}

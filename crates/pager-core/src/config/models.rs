use crate::pagination::{LayoutMetrics, PaginationConfig};
use serde::{Deserialize, Serialize};

/// High-level pager configuration, flattened from the TOML tables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub layout: PaginationConfig,
    pub font_size: u32,
    pub line_height: f32,
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub font_size_step: u32,
    pub line_height_ratio: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub log_level: LogLevel,
    pub cache_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            layout: PaginationConfig::default(),
            font_size: crate::config::defaults::default_font_size(),
            line_height: crate::config::defaults::default_line_height(),
            min_font_size: crate::config::defaults::default_min_font_size(),
            max_font_size: crate::config::defaults::default_max_font_size(),
            font_size_step: crate::config::defaults::default_font_size_step(),
            line_height_ratio: crate::config::defaults::default_line_height_ratio(),
            viewport_width: crate::config::defaults::default_viewport_width(),
            viewport_height: crate::config::defaults::default_viewport_height(),
            log_level: crate::config::defaults::default_log_level(),
            cache_dir: crate::config::defaults::default_cache_dir(),
        }
    }
}

impl AppConfig {
    /// Clamp a font size into the configured bounds. A misordered pair of
    /// bounds is treated as a single allowed size.
    pub fn clamp_font_size(&self, font_size: u32) -> u32 {
        let max = self.max_font_size.max(1);
        let min = self.min_font_size.clamp(1, max);
        font_size.clamp(min, max)
    }

    /// Line height derived from a font size, rounded to whole pixels.
    pub fn line_height_for(&self, font_size: u32) -> f32 {
        (font_size as f32 * self.line_height_ratio).round()
    }

    pub fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics::new(
            self.font_size as f32,
            self.line_height,
            self.viewport_width,
            self.viewport_height,
        )
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

use super::defaults;
use super::models::{AppConfig, LogLevel};
use crate::pagination::PaginationConfig;
use serde::Deserialize;

/// On-disk layout of the config file, one table per concern.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    layout: PaginationConfig,
    #[serde(default)]
    typography: TypographyConfig,
    #[serde(default)]
    viewport: ViewportConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    cache: CacheConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            layout: tables.layout,
            font_size: tables.typography.font_size,
            line_height: tables.typography.line_height,
            min_font_size: tables.typography.min_font_size,
            max_font_size: tables.typography.max_font_size,
            font_size_step: tables.typography.font_size_step,
            line_height_ratio: tables.typography.line_height_ratio,
            viewport_width: tables.viewport.width,
            viewport_height: tables.viewport.height,
            log_level: tables.logging.log_level,
            cache_dir: tables.cache.cache_dir,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            layout: config.layout,
            typography: TypographyConfig {
                font_size: config.font_size,
                line_height: config.line_height,
                min_font_size: config.min_font_size,
                max_font_size: config.max_font_size,
                font_size_step: config.font_size_step,
                line_height_ratio: config.line_height_ratio,
            },
            viewport: ViewportConfig {
                width: config.viewport_width,
                height: config.viewport_height,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            cache: CacheConfig {
                cache_dir: config.cache_dir.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TypographyConfig {
    #[serde(default = "defaults::default_font_size")]
    font_size: u32,
    #[serde(default = "defaults::default_line_height")]
    line_height: f32,
    #[serde(default = "defaults::default_min_font_size")]
    min_font_size: u32,
    #[serde(default = "defaults::default_max_font_size")]
    max_font_size: u32,
    #[serde(default = "defaults::default_font_size_step")]
    font_size_step: u32,
    #[serde(default = "defaults::default_line_height_ratio")]
    line_height_ratio: f32,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        TypographyConfig {
            font_size: defaults::default_font_size(),
            line_height: defaults::default_line_height(),
            min_font_size: defaults::default_min_font_size(),
            max_font_size: defaults::default_max_font_size(),
            font_size_step: defaults::default_font_size_step(),
            line_height_ratio: defaults::default_line_height_ratio(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ViewportConfig {
    #[serde(default = "defaults::default_viewport_width")]
    width: f32,
    #[serde(default = "defaults::default_viewport_height")]
    height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            width: defaults::default_viewport_width(),
            height: defaults::default_viewport_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct CacheConfig {
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            cache_dir: defaults::default_cache_dir(),
        }
    }
}

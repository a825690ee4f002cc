use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            AppConfig::default()
        }
    }
}

/// Parse the table-grouped TOML layout into an [`AppConfig`].
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let tables: ConfigTables = toml::from_str(contents).context("failed to parse config TOML")?;
    Ok(tables.into())
}

/// Render an [`AppConfig`] in the table-grouped TOML layout.
pub fn serialize_config(config: &AppConfig) -> Result<String> {
    toml::to_string(&ConfigTables::from(config)).context("failed to serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").expect("empty TOML is valid");
        assert_eq!(config, AppConfig::default());
        assert!((config.layout.average_char_width_ratio - 0.58).abs() < f32::EPSILON);
        assert!((config.layout.horizontal_chrome - 58.0).abs() < f32::EPSILON);
        assert!((config.layout.vertical_chrome - 248.0).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = parse_config(
            r#"
[layout]
average_char_width_ratio = 0.5

[typography]
font_size = 20

[logging]
log_level = "trace"
"#,
        )
        .expect("valid TOML");

        assert!((config.layout.average_char_width_ratio - 0.5).abs() < f32::EPSILON);
        assert!((config.layout.vertical_chrome - 248.0).abs() < f32::EPSILON);
        assert_eq!(config.font_size, 20);
        assert_eq!(config.max_font_size, 32);
        assert!((config.viewport_width - 375.0).abs() < f32::EPSILON);
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.cache_dir, ".cache");
    }

    #[test]
    fn log_level_defaults_to_info_and_displays_as_filter() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(AppConfig::default().log_level, LogLevel::Info);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(format!("{}", LogLevel::Trace), LogLevel::Trace.as_filter_str());
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = AppConfig::default();
        config.font_size = 24;
        config.viewport_height = 640.0;
        config.layout.horizontal_chrome = 32.0;
        config.log_level = LogLevel::Warn;

        let text = serialize_config(&config).expect("serializable");
        assert!(text.contains("[typography]"));
        assert_eq!(parse_config(&text).expect("parses"), config);
    }

    #[test]
    fn invalid_or_missing_file_falls_back_to_defaults() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("leaf_pager_test_config_{nanos}.toml"));
        assert_eq!(load_config(&path), AppConfig::default());

        fs::write(&path, "[typography]\nfont_size = \"large\"\n").expect("write temp config");
        assert_eq!(load_config(&path), AppConfig::default());
        let _ = fs::remove_file(&path);
    }
}

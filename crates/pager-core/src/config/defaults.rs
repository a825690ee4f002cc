pub(crate) fn default_average_char_width_ratio() -> f32 {
    0.58
}

pub(crate) fn default_horizontal_chrome() -> f32 {
    58.0
}

pub(crate) fn default_vertical_chrome() -> f32 {
    248.0
}

pub(crate) fn default_font_size() -> u32 {
    16
}

pub(crate) fn default_line_height() -> f32 {
    26.0
}

pub(crate) fn default_min_font_size() -> u32 {
    12
}

pub(crate) fn default_max_font_size() -> u32 {
    32
}

pub(crate) fn default_font_size_step() -> u32 {
    2
}

pub(crate) fn default_line_height_ratio() -> f32 {
    1.6
}

pub(crate) fn default_viewport_width() -> f32 {
    375.0
}

pub(crate) fn default_viewport_height() -> f32 {
    812.0
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

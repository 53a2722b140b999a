use super::error::GridError;
use serde::Deserialize;

/// Settings shipped with the bundle.
const EMBEDDED_CONFIG: &str = include_str!("../../../grid.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
    #[serde(default = "default_state_key_suffix")]
    pub state_key_suffix: String,
    #[serde(default = "default_cache_key_suffix")]
    pub cache_key_suffix: String,
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u32,
}

fn default_page_size() -> usize {
    25
}

fn default_page_size_options() -> Vec<usize> {
    vec![10, 25, 50, 100]
}

fn default_state_key_suffix() -> String {
    "-dataGridState".to_string()
}

fn default_cache_key_suffix() -> String {
    "-swr-key".to_string()
}

fn default_notification_ttl_ms() -> u32 {
    4000
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            state_key_suffix: default_state_key_suffix(),
            cache_key_suffix: default_cache_key_suffix(),
            notification_ttl_ms: default_notification_ttl_ms(),
        }
    }
}

impl GridSettings {
    /// Parses TOML settings; missing keys take their defaults.
    pub fn from_toml(source: &str) -> Result<Self, GridError> {
        let mut settings: GridSettings =
            toml::from_str(source).map_err(|e| GridError::Config(e.to_string()))?;
        if settings.default_page_size == 0 {
            return Err(GridError::Config(
                "default_page_size должен быть больше нуля".to_string(),
            ));
        }
        settings.page_size_options.retain(|size| *size > 0);
        if !settings
            .page_size_options
            .contains(&settings.default_page_size)
        {
            settings.page_size_options.push(settings.default_page_size);
            settings.page_size_options.sort_unstable();
        }
        Ok(settings)
    }
}

/// Load the embedded settings, falling back to built-in defaults.
pub fn load_settings() -> GridSettings {
    match GridSettings::from_toml(EMBEDDED_CONFIG) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("grid.toml rejected, using defaults: {}", e);
            GridSettings::default()
        }
    }
}

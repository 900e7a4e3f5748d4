use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use shared::protocol::DEFAULT_PAGE_LIMIT;

pub const SETTINGS_FILE_NAME: &str = "photo_grid.toml";
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://picsum.photos/v2";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub catalog_base_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.into(),
            page_size: DEFAULT_PAGE_LIMIT,
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = if page_size == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            page_size
        };
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if !base_url.trim().is_empty() {
            self.catalog_base_url = base_url;
        }
        self
    }
}

/// Defaults, then `photo_grid.toml` from the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();
    apply_file(&mut settings, Path::new(SETTINGS_FILE_NAME));
    apply_env(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_file(settings: &mut ClientSettings, path: &Path) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
        Ok(file_cfg) => apply_table(settings, &file_cfg),
        Err(err) => tracing::warn!(
            path = %path.display(),
            "ignoring unreadable settings file: {err}"
        ),
    }
}

fn apply_table(settings: &mut ClientSettings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("catalog_base_url").and_then(|v| v.as_str()) {
        *settings = settings.clone().with_base_url(v);
    }
    if let Some(v) = file_cfg.get("page_size").and_then(|v| v.as_integer()) {
        if let Ok(parsed) = u32::try_from(v) {
            *settings = settings.clone().with_page_size(parsed);
        }
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(|v| v.as_integer())
    {
        if let Ok(parsed) = u64::try_from(v) {
            settings.request_timeout_secs = parsed;
        }
    }
}

fn apply_env(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CATALOG_BASE_URL") {
        *settings = settings.clone().with_base_url(v);
    }
    if let Some(v) = lookup("APP__CATALOG_BASE_URL") {
        *settings = settings.clone().with_base_url(v);
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            *settings = settings.clone().with_page_size(parsed);
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_picsum_listing() {
        let settings = ClientSettings::default();
        assert_eq!(settings.catalog_base_url, "https://picsum.photos/v2");
        assert_eq!(settings.page_size, 20);
    }

    #[test]
    fn prefixed_env_wins_over_plain_env() {
        let mut settings = ClientSettings::default();
        apply_env(
            &mut settings,
            env_from(&[
                ("CATALOG_BASE_URL", "http://plain.example"),
                ("APP__CATALOG_BASE_URL", "http://prefixed.example"),
                ("APP__PAGE_SIZE", "30"),
            ]),
        );
        assert_eq!(settings.catalog_base_url, "http://prefixed.example");
        assert_eq!(settings.page_size, 30);
    }

    #[test]
    fn unparseable_and_zero_page_sizes_keep_default() {
        let mut settings = ClientSettings::default();
        apply_env(&mut settings, env_from(&[("APP__PAGE_SIZE", "lots")]));
        assert_eq!(settings.page_size, 20);

        apply_env(&mut settings, env_from(&[("APP__PAGE_SIZE", "0")]));
        assert_eq!(settings.page_size, 20);
    }

    #[test]
    fn reads_settings_file() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("photo_grid_config_test_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");
        let path = temp_root.join(SETTINGS_FILE_NAME);
        fs::write(
            &path,
            "catalog_base_url = \"http://127.0.0.1:9000/v2\"\npage_size = 12\nrequest_timeout_secs = 5\n",
        )
        .expect("write settings");

        let mut settings = ClientSettings::default();
        apply_file(&mut settings, &path);

        assert_eq!(settings.catalog_base_url, "http://127.0.0.1:9000/v2");
        assert_eq!(settings.page_size, 12);
        assert_eq!(settings.request_timeout_secs, 5);

        fs::remove_dir_all(temp_root).expect("cleanup");
    }

    #[test]
    fn missing_file_leaves_defaults() {
        let mut settings = ClientSettings::default();
        apply_file(&mut settings, Path::new("/nonexistent/photo_grid.toml"));
        assert_eq!(settings, ClientSettings::default());
    }
}

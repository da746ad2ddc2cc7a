//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use rf_fetch::FeedSource;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding the CSV reference tables.
    pub data_folder: PathBuf,
    /// Cache folder of downloaded calendar feeds.
    pub schedule_folder: PathBuf,
    /// Feed URL pattern containing `{identifier}`.
    pub schedule_url: String,
    /// Download feeds again even when cached.
    pub reload: bool,
    /// Maximum number of concurrent downloads.
    pub threads: usize,
    /// IANA zone for floating calendar times, query dates and display.
    pub timezone: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_folder", &self.data_folder)
            .field("schedule_folder", &self.schedule_folder)
            .field("schedule_url", &self.schedule_url)
            .field("reload", &self.reload)
            .field("threads", &self.threads)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let cache_dir = dirs_cache_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_folder: data_dir.join("data"),
            schedule_folder: cache_dir.join("schedules"),
            schedule_url: String::new(),
            reload: true,
            threads: default_threads(),
            timezone: iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string()),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // RF_DATA_FOLDER, RF_SCHEDULE_URL, ...
        figment = figment.merge(Env::prefixed("RF_"));

        figment.extract()
    }

    /// The configured zone.
    pub fn zone(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("unknown time zone {:?}: {e}", self.timezone))
    }

    /// Feed retrieval settings, `reload` overriding the configured value.
    pub fn feed_source(&self, reload: Option<bool>) -> FeedSource {
        FeedSource {
            folder: self.schedule_folder.clone(),
            url_pattern: self.schedule_url.clone(),
            reload: reload.unwrap_or(self.reload),
        }
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(2, |n| n.get() * 2)
}

/// Returns the platform-specific config directory for rf.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("rf"))
}

/// Returns the platform-specific data directory for rf.
///
/// On Linux: `~/.local/share/rf`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("rf"))
}

/// Returns the platform-specific cache directory for rf.
///
/// On Linux: `~/.cache/rf`
pub fn dirs_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("rf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_rf() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "rf");
    }

    #[test]
    fn test_dirs_cache_path_ends_with_rf() {
        let path = dirs_cache_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "rf");
    }

    #[test]
    fn test_default_config_layout() {
        let config = Config::default();
        assert_eq!(config.data_folder, dirs_data_path().unwrap().join("data"));
        assert_eq!(
            config.schedule_folder,
            dirs_cache_path().unwrap().join("schedules")
        );
        assert!(config.reload);
        assert!(config.threads >= 2);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rf.toml");
        std::fs::write(
            &path,
            "schedule_url = \"https://planning.example.org/{identifier}.ics\"\nreload = false\ntimezone = \"Europe/Paris\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert!(!config.reload);
        assert_eq!(config.zone().unwrap(), chrono_tz::Europe::Paris);

        let source = config.feed_source(None);
        assert!(!source.reload);
        assert_eq!(
            source.url_for("42").unwrap(),
            "https://planning.example.org/42.ics"
        );
        assert!(config.feed_source(Some(true)).reload);
    }

    #[test]
    fn test_zone_rejects_unknown_names() {
        let config = Config {
            timezone: "Mars/Olympus".to_string(),
            ..Config::default()
        };
        let err = config.zone().unwrap_err().to_string();
        assert!(err.starts_with("unknown time zone \"Mars/Olympus\""));
    }
}

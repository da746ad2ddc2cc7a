//! Builds a ready-to-query catalog from the configured sources.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Args;
use rf_core::Catalog;
use rf_data::Feed;
use rf_fetch::{FeedSource, FetchError, Fetcher};

use crate::Config;

/// Options controlling how schedules are obtained.
#[derive(Debug, Clone, Default, Args)]
pub struct LoadArgs {
    /// Force the reloading of schedules.
    #[arg(long, overrides_with = "no_reload")]
    pub reload: bool,

    /// Use cached schedules when available.
    #[arg(long, overrides_with = "reload")]
    pub no_reload: bool,

    /// Number of schedules downloaded concurrently.
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl LoadArgs {
    /// The reload override, if any flag was given.
    pub const fn reload(&self) -> Option<bool> {
        if self.reload {
            Some(true)
        } else if self.no_reload {
            Some(false)
        } else {
            None
        }
    }

    pub fn threads(&self, config: &Config) -> usize {
        self.threads.unwrap_or(config.threads)
    }
}

/// Downloads (or reads from cache) the feeds of `schedule_ids`.
pub fn fetch_feeds(
    source: FeedSource,
    schedule_ids: &[&str],
    threads: usize,
) -> Result<Vec<(String, Result<String, FetchError>)>> {
    let fetcher = Fetcher::new(source).context("failed to create feed fetcher")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    Ok(runtime.block_on(fetcher.fetch_all(schedule_ids, threads)))
}

/// Loads the reference tables; every classroom starts with an empty schedule.
pub fn load_reference(config: &Config) -> Result<Catalog> {
    rf_data::load_catalog(&config.data_folder).with_context(|| {
        format!(
            "failed to load reference tables from {}",
            config.data_folder.display()
        )
    })
}

/// Loads the reference tables, then fetches and installs every schedule.
///
/// Schedules that cannot be obtained are logged and left empty.
pub fn open_catalog(config: &Config, load: &LoadArgs, zone: Tz) -> Result<Catalog> {
    let catalog = load_reference(config)?;

    let feeds: Vec<Feed> = fetch_feeds(
        config.feed_source(load.reload()),
        &catalog.schedule_ids(),
        load.threads(config),
    )?
    .into_iter()
    .filter_map(|(schedule_id, result)| match result {
        Ok(contents) => Some(Feed {
            schedule_id,
            contents,
        }),
        Err(e) => {
            tracing::warn!(%schedule_id, error = %e, "schedule unavailable");
            None
        }
    })
    .collect();

    let installed = rf_data::install_feeds(&catalog, &feeds, zone);
    tracing::debug!(
        classrooms = catalog.classrooms().len(),
        installed,
        "catalog ready"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_override() {
        assert_eq!(LoadArgs::default().reload(), None);
        let forced = LoadArgs {
            reload: true,
            ..LoadArgs::default()
        };
        assert_eq!(forced.reload(), Some(true));
        let cached = LoadArgs {
            no_reload: true,
            ..LoadArgs::default()
        };
        assert_eq!(cached.reload(), Some(false));
    }

    #[test]
    fn open_catalog_installs_cached_schedules() {
        let data = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        for kind in rf_core::LocationKind::ALL {
            std::fs::write(
                data.path().join(rf_data::location_file(kind)),
                "alias,name,indication\n",
            )
            .unwrap();
        }
        std::fs::write(
            data.path().join(rf_data::CLASSROOMS_FILE),
            "name,description,floor,sub_building,building,location,places,outlets,computers,projector,audio,schedule_id\nA101,,1,,,,,,,No,No,1001\nA102,,1,,,,,,,No,No,1002\n",
        )
        .unwrap();
        std::fs::write(
            cache.path().join("1001.ics"),
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//rf//tests//EN\r\nBEGIN:VEVENT\r\nUID:1\r\nSUMMARY:Math\r\nDTSTART:20250310T090000Z\r\nDTEND:20250310T100000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
        )
        .unwrap();

        let config = Config {
            data_folder: data.path().to_path_buf(),
            schedule_folder: cache.path().to_path_buf(),
            schedule_url: "http://127.0.0.1:9/{identifier}".to_string(),
            reload: false,
            threads: 2,
            timezone: "UTC".to_string(),
        };
        let catalog = open_catalog(&config, &LoadArgs::default(), chrono_tz::UTC).unwrap();

        let [a101, a102] = catalog.classrooms() else {
            panic!("expected two classrooms");
        };
        assert_eq!(a101.schedule().len(), 1);
        assert!(a102.schedule().is_empty());
    }
}

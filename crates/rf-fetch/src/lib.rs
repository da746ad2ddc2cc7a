//! Calendar feed retrieval for the classroom finder.
//!
//! Feeds are downloaded from a URL pattern and cached on disk, one
//! `<identifier>.ics` file per schedule. With `reload` off, a cached file is
//! reused as is; with `reload` on, the feed is downloaded again and the cache
//! only serves as a fallback when the download fails.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Placeholder substituted with the schedule identifier in URL patterns.
pub const IDENTIFIER_PLACEHOLDER: &str = "{identifier}";

/// Default request timeout for feed downloads.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Feed retrieval errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL pattern has no identifier placeholder.
    #[error("schedule URL pattern {pattern:?} does not contain {{identifier}}")]
    InvalidPattern { pattern: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with an error status.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    /// Reading or writing the cache failed.
    #[error("cache error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The download task did not complete.
    #[error("download of {schedule_id} was interrupted")]
    Interrupted { schedule_id: String },
}

/// Where feeds come from and how the cache is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    /// Cache folder.
    pub folder: PathBuf,
    /// URL pattern containing [`IDENTIFIER_PLACEHOLDER`].
    pub url_pattern: String,
    /// Download again even when a cached copy exists.
    pub reload: bool,
}

impl FeedSource {
    /// Cache path of the feed of `schedule_id`.
    pub fn path_for(&self, schedule_id: &str) -> PathBuf {
        self.folder.join(format!("{schedule_id}.ics"))
    }

    /// Download URL of the feed of `schedule_id`.
    pub fn url_for(&self, schedule_id: &str) -> Result<String, FetchError> {
        if !self.url_pattern.contains(IDENTIFIER_PLACEHOLDER) {
            return Err(FetchError::InvalidPattern {
                pattern: self.url_pattern.clone(),
            });
        }
        Ok(self
            .url_pattern
            .replace(IDENTIFIER_PLACEHOLDER, schedule_id))
    }
}

/// Downloads and caches calendar feeds.
///
/// Cloning is cheap: clones share the HTTP connection pool.
#[derive(Clone)]
pub struct Fetcher {
    http: reqwest::Client,
    source: Arc<FeedSource>,
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(source: FeedSource) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            http,
            source: Arc::new(source),
        })
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Returns the contents of the feed of `schedule_id`.
    pub async fn fetch(&self, schedule_id: &str) -> Result<String, FetchError> {
        let path = self.source.path_for(schedule_id);

        if !self.source.reload {
            if let Some(contents) = read_cached(&path).await? {
                tracing::debug!(schedule_id, "using cached feed");
                return Ok(contents);
            }
        }

        match self.download(schedule_id, &path).await {
            Ok(contents) => Ok(contents),
            Err(e) => match read_cached(&path).await {
                Ok(Some(contents)) => {
                    tracing::warn!(schedule_id, error = %e, "download failed, using cached feed");
                    Ok(contents)
                }
                _ => Err(e),
            },
        }
    }

    async fn download(&self, schedule_id: &str, path: &Path) -> Result<String, FetchError> {
        let url = self.source.url_for(schedule_id)?;
        tracing::debug!(schedule_id, %url, "downloading feed");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let contents = response.text().await?;

        tokio::fs::create_dir_all(&self.source.folder)
            .await
            .map_err(|source| FetchError::Io {
                path: self.source.folder.clone(),
                source,
            })?;
        tokio::fs::write(path, &contents)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(contents)
    }

    /// Fetches every distinct identifier with at most `concurrency` requests
    /// in flight.
    ///
    /// Results follow the order of first appearance in `schedule_ids`.
    pub async fn fetch_all<S: AsRef<str>>(
        &self,
        schedule_ids: &[S],
        concurrency: usize,
    ) -> Vec<(String, Result<String, FetchError>)> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = schedule_ids
            .iter()
            .map(|id| id.as_ref().to_string())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for (index, schedule_id) in ids.iter().enumerate() {
            let fetcher = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let schedule_id = schedule_id.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (index, Err(FetchError::Interrupted { schedule_id }));
                };
                (index, fetcher.fetch(&schedule_id).await)
            });
        }

        let mut results: Vec<Option<Result<String, FetchError>>> =
            std::iter::repeat_with(|| None).take(ids.len()).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => tracing::error!(error = %e, "feed download task failed"),
            }
        }

        ids.into_iter()
            .zip(results)
            .map(|(schedule_id, result)| {
                let result = result.unwrap_or_else(|| {
                    Err(FetchError::Interrupted {
                        schedule_id: schedule_id.clone(),
                    })
                });
                (schedule_id, result)
            })
            .collect()
    }
}

async fn read_cached(path: &Path) -> Result<Option<String>, FetchError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(FetchError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

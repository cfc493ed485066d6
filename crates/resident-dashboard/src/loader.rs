//! Data loading and override merging.
//!
//! The base record comes from a JSON document at a local path or an
//! `http(s)` URL. Admin edits live in the [`OverrideStore`] and are merged on
//! top of it every time the dashboard is read.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{DashboardRecord, MealPlan, RecordOverride};
use crate::storage::OverrideStore;

/// A place the base record can be fetched from.
#[async_trait]
pub trait BaseSource: Send + Sync + std::fmt::Debug {
    /// Human-readable location for messages.
    fn location(&self) -> String;

    /// Fetch and parse the base record.
    ///
    /// # Errors
    ///
    /// Returns a load error if the document cannot be retrieved or parsed.
    async fn fetch_base(&self) -> Result<DashboardRecord>;
}

/// Base record read from the local file system.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BaseSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_base(&self) -> Result<DashboardRecord> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::load(self.location(), e.to_string()))?;
        parse_base(&self.location(), &text)
    }
}

/// Base record served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Create a source for `url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns a load error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::load(url.clone(), e.to_string()))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl BaseSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch_base(&self) -> Result<DashboardRecord> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| Error::load(self.location(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LoadStatus {
                location: self.location(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::load(self.location(), e.to_string()))?;
        parse_base(&self.location(), &text)
    }
}

fn parse_base(location: &str, text: &str) -> Result<DashboardRecord> {
    DashboardRecord::from_json(text).map_err(|source| Error::LoadParse {
        location: location.to_string(),
        source,
    })
}

/// Pick a source for a configured location string.
///
/// `http://` and `https://` locations are fetched over the network; anything
/// else is treated as a file path.
///
/// # Errors
///
/// Returns a load error if an HTTP client cannot be built.
pub fn source_for(location: &str, timeout: Duration) -> Result<Box<dyn BaseSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// Combine the base record with an optional override.
///
/// The merge is shallow and driven by which fields the override carries:
///
/// - `updatedAt` and unknown top-level keys: the override's value wins.
/// - `meals`: breakfast, lunch and dinner are taken one at a time from the
///   override when present, else from the base. An explicit `null` meal in
///   the override counts as absent, so it never blanks a base line.
/// - `events` and `photos`: the override's list replaces the base list
///   entirely. Lists are never merged element by element.
#[must_use]
pub fn merge(base: DashboardRecord, overlay: Option<RecordOverride>) -> DashboardRecord {
    let Some(overlay) = overlay else {
        return base;
    };

    let meals = match overlay.meals {
        Some(partial) => MealPlan {
            breakfast: partial.breakfast.unwrap_or(base.meals.breakfast),
            lunch: partial.lunch.unwrap_or(base.meals.lunch),
            dinner: partial.dinner.unwrap_or(base.meals.dinner),
        },
        None => base.meals,
    };

    let mut extra = base.extra;
    extra.extend(overlay.extra);

    DashboardRecord {
        meals,
        events: overlay.events.unwrap_or(base.events),
        photos: overlay.photos.unwrap_or(base.photos),
        updated_at: overlay.updated_at.or(base.updated_at),
        extra,
    }
}

/// Composes a base source with the override store.
#[derive(Debug)]
pub struct Loader {
    source: Box<dyn BaseSource>,
    store: OverrideStore,
}

impl Loader {
    /// Create a loader.
    #[must_use]
    pub fn new(source: Box<dyn BaseSource>, store: OverrideStore) -> Self {
        Self { source, store }
    }

    /// The override store.
    #[must_use]
    pub fn store(&self) -> &OverrideStore {
        &self.store
    }

    /// Where the base record comes from.
    #[must_use]
    pub fn location(&self) -> String {
        self.source.location()
    }

    /// Fetch the base record. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns a load error if the base cannot be fetched or parsed.
    pub async fn fetch_base(&self) -> Result<DashboardRecord> {
        debug!("Fetching base record from {}", self.source.location());
        let base = self.source.fetch_base().await?;
        info!(
            events = base.events.len(),
            photos = base.photos.len(),
            "Loaded base record from {}",
            self.source.location()
        );
        Ok(base)
    }

    /// Merge an already fetched base with whatever override is stored now.
    #[must_use]
    pub fn merge_with_override(&self, base: DashboardRecord) -> DashboardRecord {
        let overlay = self.store.read_override();
        if overlay.is_some() {
            debug!("Applying local override");
        }
        merge(base, overlay)
    }

    /// Fetch the base and merge the stored override into it.
    ///
    /// # Errors
    ///
    /// Returns a load error if the base cannot be fetched or parsed.
    pub async fn load(&self) -> Result<DashboardRecord> {
        let base = self.fetch_base().await?;
        Ok(self.merge_with_override(base))
    }
}

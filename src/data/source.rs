use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Which static asset to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceDescriptor {
    YearlyRevenue(i32),
    Gdp,
    ConflictEvents,
    WorldGeometry,
}

/// Locations of the dashboard's static assets.
///
/// Entries starting with `http://` or `https://` are used verbatim; anything
/// else is resolved against `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub root: PathBuf,
    /// `{year}` is substituted with the requested year.
    pub yearly_revenue_pattern: String,
    pub gdp: String,
    pub conflict_events: String,
    pub world_geometry: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            yearly_revenue_pattern: "csv/companies_data/{year}.csv".to_owned(),
            gdp: "csv/world_gdp_data.csv".to_owned(),
            conflict_events: "csv/MiddleEast_2015-2024_Sep27_sampled.csv".to_owned(),
            world_geometry: "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json"
                .to_owned(),
        }
    }
}

impl DataPaths {
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn locate(&self, descriptor: SourceDescriptor) -> String {
        let relative = match descriptor {
            SourceDescriptor::YearlyRevenue(year) => self
                .yearly_revenue_pattern
                .replace("{year}", &year.to_string()),
            SourceDescriptor::Gdp => self.gdp.clone(),
            SourceDescriptor::ConflictEvents => self.conflict_events.clone(),
            SourceDescriptor::WorldGeometry => self.world_geometry.clone(),
        };
        if is_remote(&relative) {
            return relative;
        }
        self.root.join(relative).to_string_lossy().into_owned()
    }
}

#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Byte-level access to dataset assets.
///
/// Implementations must be shareable across threads so joined fetches can
/// run concurrently.
pub trait DataSource: Send + Sync {
    fn fetch_text(&self, location: &str) -> Result<String, LoadError>;
}

/// Reads assets from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl DataSource for FileSource {
    fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        if is_remote(location) {
            return Err(LoadError::Http {
                source_name: location.to_owned(),
                reason: "remote locations need an http source".to_owned(),
            });
        }
        std::fs::read_to_string(location).map_err(|e| LoadError::Io {
            source_name: location.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// In-memory assets keyed by location; used for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: HashMap<String, String>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, location: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(location, text);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(location.into(), text.into());
    }
}

impl DataSource for StaticSource {
    fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        self.entries
            .get(location)
            .cloned()
            .ok_or_else(|| LoadError::Io {
                source_name: location.to_owned(),
                reason: "not found".to_owned(),
            })
    }
}

/// Fetches remote assets over HTTP(S) and falls back to the filesystem for
/// local paths.
#[cfg(feature = "http-source")]
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http-source")]
impl HttpSource {
    #[must_use]
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http-source")]
impl DataSource for HttpSource {
    fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        if !is_remote(location) {
            return FileSource.fetch_text(location);
        }
        let http_error = |reason: String| LoadError::Http {
            source_name: location.to_owned(),
            reason,
        };
        self.client
            .get(location)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(|e| http_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{DataPaths, SourceDescriptor};

    #[test]
    fn yearly_pattern_substitutes_year_and_remote_paths_pass_through() {
        let paths = DataPaths::default().with_root("/data");
        assert_eq!(
            paths.locate(SourceDescriptor::YearlyRevenue(2019)),
            "/data/csv/companies_data/2019.csv"
        );
        assert!(
            paths
                .locate(SourceDescriptor::WorldGeometry)
                .starts_with("https://cdn.jsdelivr.net/")
        );
    }
}

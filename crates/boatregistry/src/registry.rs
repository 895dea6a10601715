//! Boat registry: lookup, listing and counting over cached rows.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::boat::{row_serial_number, Boat};
use crate::cache::{RowCache, Rows};
use crate::config::Config;
use crate::error::Result;
use crate::mock::MockSource;
use crate::query::{run_query, BoatPage, BoatQuery};
use crate::sheets::SheetsSource;
use crate::source::{RowSource, SourceKind};

/// Identifier used by static page generation. It never names a real boat and
/// is answered without touching the data source.
pub const BUILD_PLACEHOLDER_ID: &str = "__build_placeholder__";

/// Read access to the boat registry.
///
/// Every operation reads through the same [`RowCache`], so one upstream fetch
/// serves all of them for the length of the cache window.
#[derive(Debug, Clone)]
pub struct BoatRegistry {
    cache: RowCache,
}

impl BoatRegistry {
    /// Create a registry over an arbitrary row source.
    #[must_use]
    pub fn new(source: Arc<dyn RowSource>, ttl: Duration) -> Self {
        Self {
            cache: RowCache::new(source, ttl),
        }
    }

    /// Create a registry from configuration, choosing mock or live data.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if live mode is selected and the
    /// spreadsheet credentials are missing or unusable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source: Arc<dyn RowSource> = if config.data.use_mock_data {
            info!("Using mock data, the spreadsheet will not be accessed");
            Arc::new(MockSource::generate(
                config.data.mock_count,
                config.data.mock_seed,
            ))
        } else {
            info!("Using live data from the spreadsheet");
            Arc::new(SheetsSource::from_config(&config.sheets)?)
        };

        Ok(Self::new(source, config.cache_ttl()))
    }

    /// Whether this registry serves live or synthetic data.
    #[must_use]
    pub fn source_kind(&self) -> SourceKind {
        self.cache.source().kind()
    }

    /// The cache behind this registry.
    #[must_use]
    pub fn cache(&self) -> &RowCache {
        &self.cache
    }

    /// Look up one boat by its serial number.
    ///
    /// The placeholder id returns `None` without any fetch. Otherwise the
    /// first row whose trimmed serial number equals `id` wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be fetched.
    pub async fn get_boat_by_id(&self, id: &str) -> Result<Option<Boat>> {
        let id = id.trim();
        if id == BUILD_PLACEHOLDER_ID {
            return Ok(None);
        }

        debug!(id, "Looking up boat");
        let rows = self.rows("lookup").await?;

        match rows.iter().find(|row| row_serial_number(row) == Some(id)) {
            Some(row) => {
                info!(id, "Found boat");
                Ok(Some(Boat::from_row(row)))
            }
            None => {
                warn!(id, "Boat not found");
                Ok(None)
            }
        }
    }

    /// List one page of boats, optionally filtered by a search term.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be fetched.
    pub async fn get_boats(&self, query: &BoatQuery) -> Result<BoatPage> {
        debug!(
            page = query.page,
            limit = query.limit,
            search = query.search.as_deref().unwrap_or("none"),
            "Listing boats"
        );
        let rows = self.rows("listing").await?;

        let boats: Vec<Boat> = rows.iter().map(|row| Boat::from_row(row)).collect();
        debug!(count = boats.len(), "Mapped rows to boats");

        let page = run_query(boats, query);
        info!(
            returned = page.boats.len(),
            page = page.page,
            total_pages = page.total_pages,
            total = page.total,
            "Listed boats"
        );
        Ok(page)
    }

    /// Count every row in the registry, including rows with an empty serial.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be fetched.
    pub async fn total_count(&self) -> Result<usize> {
        let rows = self.rows("count").await?;
        info!(total = rows.len(), "Counted boats");
        Ok(rows.len())
    }

    async fn rows(&self, operation: &'static str) -> Result<Rows> {
        self.cache.get().await.map_err(|e| {
            error!(operation, error = %e, "Failed to read boat rows");
            e
        })
    }
}

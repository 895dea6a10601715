//! In-memory search and pagination over boat records.

use serde::{Deserialize, Serialize};

use crate::boat::Boat;

/// Page size used when none (or zero) is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Parameters of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoatQuery {
    /// 1-based page number.
    pub page: u32,
    /// Number of boats per page.
    pub limit: u32,
    /// Case-insensitive substring matched against registration number and owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for BoatQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl BoatQuery {
    /// Create a query for the given page and page size.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            search: None,
        }
    }

    /// Attach a search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Page number with 0 clamped to 1.
    #[must_use]
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    /// Page size with 0 replaced by [`DEFAULT_PAGE_SIZE`].
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        if self.limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.limit
        }
    }
}

/// One page of a boat listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoatPage {
    /// Boats on this page.
    pub boats: Vec<Boat>,
    /// Number of boats matching the search, across all pages.
    pub total: usize,
    /// Page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// `ceil(total / limit)`.
    pub total_pages: usize,
}

impl BoatPage {
    /// Check if this page holds no boats.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boats.is_empty()
    }
}

/// Check whether a boat matches a lowercased needle.
#[must_use]
pub fn matches_search(boat: &Boat, needle: &str) -> bool {
    boat.boat_number.to_lowercase().contains(needle)
        || boat.owner_name.to_lowercase().contains(needle)
}

/// Keep the boats whose registration number or owner contains the search term.
///
/// A missing, empty or whitespace-only term keeps everything.
#[must_use]
pub fn filter_boats(boats: Vec<Boat>, search: Option<&str>) -> Vec<Boat> {
    let needle = search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    match needle {
        Some(needle) => boats
            .into_iter()
            .filter(|boat| matches_search(boat, &needle))
            .collect(),
        None => boats,
    }
}

/// Cut one page out of an already filtered set.
///
/// Pages past the end yield no boats; `total` and `total_pages` always
/// describe the whole set.
#[must_use]
pub fn paginate(boats: Vec<Boat>, page: u32, limit: u32) -> BoatPage {
    let page = page.max(1);
    let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };

    let total = boats.len();
    let per_page = limit as usize;
    let total_pages = total.div_ceil(per_page);

    let start = (page as usize - 1).saturating_mul(per_page);
    let boats = boats.into_iter().skip(start).take(per_page).collect();

    BoatPage {
        boats,
        total,
        page,
        limit,
        total_pages,
    }
}

/// Apply a query's search and pagination to a full record set.
#[must_use]
pub fn run_query(boats: Vec<Boat>, query: &BoatQuery) -> BoatPage {
    let filtered = filter_boats(boats, query.search.as_deref());
    paginate(filtered, query.effective_page(), query.effective_limit())
}

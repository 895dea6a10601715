//! `boatregistry` - Read access to a spreadsheet-backed fishing boat registry
//!
//! This library maps positional spreadsheet rows onto boat records, caches the
//! full row set behind a short time-to-live, and serves lookups by serial
//! number, searchable paginated listings and total counts. A generated mock
//! data set can stand in for the spreadsheet during local development.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod boat;
pub mod cache;
pub mod cli;
pub mod columns;
pub mod config;
pub mod error;
pub mod logging;
pub mod mock;
pub mod query;
pub mod registry;
pub mod sheets;
pub mod source;

pub use boat::{Boat, Cell, RawRow};
pub use cache::RowCache;
pub use columns::{BoatField, COLUMN_COUNT};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use mock::MockSource;
pub use query::{BoatPage, BoatQuery, DEFAULT_PAGE_SIZE};
pub use registry::{BoatRegistry, BUILD_PLACEHOLDER_ID};
pub use sheets::SheetsSource;
pub use source::{RowSource, SourceKind};

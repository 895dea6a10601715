//! Row source abstraction.
//!
//! A row source produces every registry row in sheet order. The live source
//! reads the spreadsheet; the mock source generates synthetic boats.

use crate::boat::RawRow;
use crate::error::Result;

/// The kind of data a row source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Rows read from the spreadsheet provider.
    Live,
    /// Synthetic rows for local development.
    Mock,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// Trait for anything that can produce all registry rows.
///
/// Implementors are shared across tasks behind an `Arc`, and a fetch may
/// outlive the caller that triggered it.
#[async_trait::async_trait]
pub trait RowSource: Send + Sync + std::fmt::Debug {
    /// The name of this source (for logging).
    fn name(&self) -> &'static str;

    /// Whether this source is live or synthetic.
    fn kind(&self) -> SourceKind;

    /// Fetch every row below the header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be obtained, for example when the
    /// spreadsheet provider is unreachable or rejects the credentials.
    async fn fetch_rows(&self) -> Result<Vec<RawRow>>;
}

//! Live row source backed by a Google Sheets document.
//!
//! The source authenticates with a service account, checks that the
//! configured sheet exists and reads every row below the header row.

mod auth;
mod client;

pub use auth::{ServiceAccountAuth, SHEETS_READONLY_SCOPE};
pub use client::{
    data_range, header_range, GridProperties, SheetProperties, SheetsClient, SpreadsheetInfo,
};

#[cfg(test)]
pub(crate) use auth::test_private_key_pem;

use tracing::{debug, error, info, Level};

use crate::boat::RawRow;
use crate::config::{SheetsConfig, MAX_SHEET_ROWS};
use crate::error::{Error, Result};
use crate::source::{RowSource, SourceKind};

/// Row source reading the registry sheet.
#[derive(Debug)]
pub struct SheetsSource {
    client: SheetsClient,
    sheet_name: String,
    header_row: u32,
}

impl SheetsSource {
    /// Build a live source from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMissing`] if the service account e-mail, the
    /// private key or the document id is absent, and a crypto error if the
    /// private key cannot be parsed. A header row outside the sheet grid is
    /// a validation error.
    pub fn from_config(config: &SheetsConfig) -> Result<Self> {
        let missing = config.missing_credentials();
        if !missing.is_empty() {
            return Err(Error::ConfigMissing { keys: missing });
        }

        if !(1..=MAX_SHEET_ROWS).contains(&config.header_row) {
            return Err(Error::config_validation(format!(
                "header_row must be between 1 and {MAX_SHEET_ROWS}"
            )));
        }

        let (Some(email), Some(key), Some(sheet_id)) = (
            config.service_account_email.as_deref(),
            config.private_key_pem(),
            config.sheet_id.as_deref(),
        ) else {
            return Err(Error::internal("credentials vanished after validation"));
        };

        let auth = ServiceAccountAuth::new(email.trim(), &key, config.token_url.as_str())?;
        let client = SheetsClient::new(
            auth,
            &config.api_base_url,
            sheet_id.trim(),
            config.request_timeout(),
        )?;

        Ok(Self::new(client, config.sheet_name.clone(), config.header_row))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: SheetsClient, sheet_name: impl Into<String>, header_row: u32) -> Self {
        Self {
            client,
            sheet_name: sheet_name.into(),
            header_row,
        }
    }

    /// The sheet title rows are read from.
    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// The 1-based header row.
    #[must_use]
    pub fn header_row(&self) -> u32 {
        self.header_row
    }

    async fn load(&self) -> Result<Vec<RawRow>> {
        info!(
            spreadsheet_id = %self.client.spreadsheet_id(),
            sheet = %self.sheet_name,
            "Connecting to spreadsheet"
        );

        let info = self.client.load_info().await?;
        if info.sheet_by_title(&self.sheet_name).is_none() {
            return Err(Error::SheetNotFound {
                name: self.sheet_name.clone(),
                available: info.sheet_titles(),
            });
        }
        info!(title = %info.title, "Connected to spreadsheet");

        if self.header_row != 1 && tracing::enabled!(Level::DEBUG) {
            let headers = self
                .client
                .header_values(&self.sheet_name, self.header_row)
                .await?;
            debug!(header_row = self.header_row, ?headers, "Using custom header row");
        }

        let rows = self.client.rows(&self.sheet_name, self.header_row).await?;
        info!(count = rows.len(), "Loaded rows from spreadsheet");
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl RowSource for SheetsSource {
    fn name(&self) -> &'static str {
        "google-sheets"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Live
    }

    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        match self.load().await {
            Ok(rows) => Ok(rows),
            Err(e) => {
                error!(error = %e, sheet = %self.sheet_name, "Failed to read spreadsheet");
                Err(e)
            }
        }
    }
}

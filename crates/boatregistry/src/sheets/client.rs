//! Sheets REST API client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, error};

use super::auth::ServiceAccountAuth;
use crate::boat::{Cell, RawRow};
use crate::columns::{column_letter, COLUMN_COUNT};
use crate::error::{Error, Result};

/// Document metadata returned by [`SheetsClient::load_info`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetInfo {
    /// Document title.
    pub title: String,
    /// Sheets in tab order.
    pub sheets: Vec<SheetProperties>,
}

impl SpreadsheetInfo {
    /// Find a sheet by its exact title.
    #[must_use]
    pub fn sheet_by_title(&self, title: &str) -> Option<&SheetProperties> {
        self.sheets.iter().find(|sheet| sheet.title == title)
    }

    /// Titles of all sheets in tab order.
    #[must_use]
    pub fn sheet_titles(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.title.clone()).collect()
    }
}

/// Properties of one sheet (tab) in a document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    /// Numeric sheet id.
    #[serde(default)]
    pub sheet_id: i64,
    /// Tab title.
    pub title: String,
    /// Position among the tabs.
    #[serde(default)]
    pub index: u32,
    /// Grid dimensions, when the sheet is a grid.
    #[serde(default)]
    pub grid_properties: Option<GridProperties>,
}

/// Grid dimensions of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    /// Number of rows in the grid.
    #[serde(default)]
    pub row_count: u32,
    /// Number of columns in the grid.
    #[serde(default)]
    pub column_count: u32,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    properties: DocumentProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct DocumentProperties {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
}

/// Client for one spreadsheet document.
#[derive(Debug)]
pub struct SheetsClient {
    http: Client,
    auth: ServiceAccountAuth,
    base_url: Url,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Create a client for the given document.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(
        auth: ServiceAccountAuth,
        base_url: &str,
        spreadsheet_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config_validation(format!("invalid api_base_url {base_url}: {e}")))?;
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            auth,
            base_url,
            spreadsheet_id: spreadsheet_id.into(),
        })
    }

    /// The document identifier.
    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Load document metadata and the list of sheets.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or the request fails.
    pub async fn load_info(&self) -> Result<SpreadsheetInfo> {
        debug!(spreadsheet_id = %self.spreadsheet_id, "Loading spreadsheet info");

        let url = self.endpoint(&[])?;
        let response: SpreadsheetResponse = self
            .get_json(url, &[("fields", "properties.title,sheets.properties")])
            .await?;

        let info = SpreadsheetInfo {
            title: response.properties.title,
            sheets: response.sheets.into_iter().map(|s| s.properties).collect(),
        };
        debug!(title = %info.title, sheet_count = info.sheets.len(), "Document loaded");
        Ok(info)
    }

    /// Read the cells of an A1-notation range, row by row.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or the request fails.
    pub async fn values(&self, range: &str) -> Result<Vec<RawRow>> {
        let url = self.endpoint(&["values", range])?;
        let response: ValueRange = self
            .get_json(
                url,
                &[
                    ("majorDimension", "ROWS"),
                    ("valueRenderOption", "FORMATTED_VALUE"),
                ],
            )
            .await?;

        Ok(response
            .values
            .into_iter()
            .map(|row| row.into_iter().map(json_cell).collect())
            .collect())
    }

    /// Read every registry row below the 1-based `header_row`.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or the request fails.
    pub async fn rows(&self, sheet_title: &str, header_row: u32) -> Result<Vec<RawRow>> {
        self.values(&data_range(sheet_title, header_row)).await
    }

    /// Read the header cells on the 1-based `header_row`.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or the request fails.
    pub async fn header_values(&self, sheet_title: &str, header_row: u32) -> Result<Vec<String>> {
        let rows = self.values(&header_range(sheet_title, header_row)).await?;
        Ok(rows
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect())
    }

    fn endpoint(&self, tail: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::internal("api_base_url cannot be a base URL"))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .extend(tail);
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url, query: &[(&str, &str)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let token = self.auth.access_token(&self.http).await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.auth.clear_token().await;
            }
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            error!(status = status.as_u16(), %message, "Spreadsheet request failed");
            return Err(Error::api(status.as_u16(), message));
        }

        Ok(response.json().await?)
    }
}

/// Range covering every data row under the header, columns A through P.
#[must_use]
pub fn data_range(sheet_title: &str, header_row: u32) -> String {
    format!(
        "{}!A{}:{}",
        quote_sheet_title(sheet_title),
        header_row.saturating_add(1),
        column_letter(COLUMN_COUNT - 1)
    )
}

/// Range covering only the header row, columns A through P.
#[must_use]
pub fn header_range(sheet_title: &str, header_row: u32) -> String {
    let last = column_letter(COLUMN_COUNT - 1);
    format!(
        "{}!A{header_row}:{last}{header_row}",
        quote_sheet_title(sheet_title)
    )
}

/// Quote a sheet title for A1 notation, doubling embedded single quotes.
fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Convert a JSON cell into a [`Cell`]. Nulls become absent; scalars are stringified.
fn json_cell(value: JsonValue) -> Cell {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Pull `error.message` out of a Google API error body.
fn api_error_message(body: &str) -> Option<String> {
    let json: JsonValue = serde_json::from_str(body).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

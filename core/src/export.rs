//! CSV export of query results.
//!
//! A result set is turned into a list of [`Record`]s (ordered column/value
//! pairs). The header comes from the first record's columns; every row then
//! emits its values for those columns, in the same order.

use crate::domain::{HighValueUser, Recommendation, TopProduct, UserId};
use crate::input::InputError;
use crate::pagination::PageRequest;
use crate::store::{StoreError, Storefront};
use rust_decimal::Decimal;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while exporting.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export; no header can be derived.
    #[error("No data to export")]
    Empty,

    /// Writing the destination file failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// One exported row: column names and values in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a column, builder style.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields.push((column.into(), value.to_string()));
        self
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(column, _)| column.as_str())
    }

    /// Value of `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }
}

impl From<&Recommendation> for Record {
    fn from(row: &Recommendation) -> Self {
        Self::new()
            .with("product_name", &row.product_name)
            .with("price", row.price)
    }
}

impl From<&HighValueUser> for Record {
    fn from(row: &HighValueUser) -> Self {
        Self::new()
            .with("id", row.id)
            .with("name", &row.name)
            .with("total_value", row.total_value)
    }
}

impl From<&TopProduct> for Record {
    fn from(row: &TopProduct) -> Self {
        Self::new()
            .with("user_name", &row.user_name)
            .with("product_name", &row.product_name)
            .with("total_quantity", row.total_quantity)
    }
}

/// Quote a field if it contains a delimiter, quote, CR or LF.
fn quote_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = fields.map(quote_field).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Render records as CSV text: one header line plus one line per record.
///
/// # Errors
///
/// Returns [`ExportError::Empty`] if `records` is empty.
pub fn to_csv_string(records: &[Record]) -> Result<String, ExportError> {
    let first = records.first().ok_or(ExportError::Empty)?;
    let header: Vec<&str> = first.columns().collect();

    let mut out = String::new();
    write_line(&mut out, header.iter().copied());
    for record in records {
        write_line(
            &mut out,
            header.iter().map(|column| record.get(column).unwrap_or("")),
        );
    }
    Ok(out)
}

/// Write records to `destination`, creating or overwriting it.
///
/// Returns the number of data rows written. An empty input fails before the
/// filesystem is touched.
///
/// # Errors
///
/// Returns [`ExportError::Empty`] or [`ExportError::Io`].
pub async fn export_to_csv(
    records: &[Record],
    destination: impl AsRef<Path>,
) -> Result<usize, ExportError> {
    let csv = to_csv_string(records)?;
    write_csv(&csv, destination).await?;
    Ok(records.len())
}

/// Write already rendered CSV text to `destination`, creating or overwriting it.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be written.
pub async fn write_csv(csv: &str, destination: impl AsRef<Path>) -> Result<(), ExportError> {
    let destination = destination.as_ref();
    tokio::fs::write(destination, csv)
        .await
        .map_err(|source| ExportError::Io {
            path: destination.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %destination.display(), bytes = csv.len(), "CSV export written");
    Ok(())
}

/// The queries whose results can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Products a user has not ordered
    Recommendations,
    /// Users above a spend threshold
    HighValueUsers,
    /// A user's most ordered product
    TopProducts,
}

impl QueryKind {
    /// Name used on the command line, in URLs and in file names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recommendations => "recommendations",
            Self::HighValueUsers => "highvalueusers",
            Self::TopProducts => "topproducts",
        }
    }
}

impl FromStr for QueryKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommendations" => Ok(Self::Recommendations),
            "highvalueusers" => Ok(Self::HighValueUsers),
            "topproducts" => Ok(Self::TopProducts),
            other => Err(InputError::UnknownQueryType(other.to_string())),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully parameterized query to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportQuery {
    /// Export one page of recommendations
    Recommendations {
        /// User to recommend for
        user_id: UserId,
        /// Page to export
        page: PageRequest,
    },
    /// Export one page of high-value users
    HighValueUsers {
        /// Spend threshold
        threshold: Decimal,
        /// Page to export
        page: PageRequest,
    },
    /// Export a user's top product
    TopProducts {
        /// User to inspect
        user_id: UserId,
    },
}

impl ExportQuery {
    /// Which query this is.
    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        match self {
            Self::Recommendations { .. } => QueryKind::Recommendations,
            Self::HighValueUsers { .. } => QueryKind::HighValueUsers,
            Self::TopProducts { .. } => QueryKind::TopProducts,
        }
    }

    /// `<queryType>.csv`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.kind())
    }
}

/// Run `query` against `store` and convert its rows to records.
///
/// # Errors
///
/// Returns the [`StoreError`] of the underlying query.
pub async fn collect_records(
    store: &dyn Storefront,
    query: &ExportQuery,
) -> Result<Vec<Record>, StoreError> {
    let records = match *query {
        ExportQuery::Recommendations { user_id, page } => store
            .recommendations(user_id, page)
            .await?
            .data
            .iter()
            .map(Record::from)
            .collect(),
        ExportQuery::HighValueUsers { threshold, page } => store
            .high_value_users(threshold, page)
            .await?
            .data
            .iter()
            .map(Record::from)
            .collect(),
        ExportQuery::TopProducts { user_id } => store
            .top_product_per_user(user_id)
            .await?
            .iter()
            .map(Record::from)
            .collect(),
    };
    Ok(records)
}

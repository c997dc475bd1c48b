//! CSV export endpoint.
//!
//! `POST /export/:queryType` runs the named query with the given parameters,
//! writes `<queryType>.csv` to the export directory and returns the same CSV
//! text as the response body. The body is rendered once in memory, so a
//! concurrent export of the same query type cannot change what this request
//! returns.

use crate::{WebResult, state::AppState};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shopfront_core::export::{QueryKind, collect_records, to_csv_string, write_csv};
use shopfront_core::input::{parse_amount, required_positive};
use shopfront_core::{ExportQuery, PageRequest};

/// Threshold used when `value` is omitted.
const DEFAULT_THRESHOLD: i64 = 1000;

/// Query parameters accepted by the export endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    /// User for `recommendations` and `topproducts`
    pub user_id: Option<String>,
    /// Spend threshold for `highvalueusers`
    pub value: Option<String>,
    /// Page for paginated queries
    pub page: Option<String>,
    /// Page size for paginated queries
    pub page_size: Option<String>,
}

impl ExportParams {
    /// Build the export query for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`](shopfront_core::InputError) for missing or
    /// malformed parameters.
    pub fn into_query(self, kind: QueryKind) -> Result<ExportQuery, shopfront_core::InputError> {
        let page = || PageRequest::parse(self.page.as_deref(), self.page_size.as_deref());
        Ok(match kind {
            QueryKind::Recommendations => ExportQuery::Recommendations {
                user_id: required_positive("userId", self.user_id.as_deref())?,
                page: page()?,
            },
            QueryKind::HighValueUsers => ExportQuery::HighValueUsers {
                threshold: self
                    .value
                    .as_deref()
                    .map_or(Ok(Decimal::from(DEFAULT_THRESHOLD)), |v| {
                        parse_amount("value", v)
                    })?,
                page: page()?,
            },
            QueryKind::TopProducts => ExportQuery::TopProducts {
                user_id: required_positive("userId", self.user_id.as_deref())?,
            },
        })
    }
}

/// Export a query result as CSV.
///
/// ```bash
/// curl -X POST 'http://localhost:3000/export/highvalueusers?value=1000&page=1&pageSize=5'
/// # id,name,total_value
/// # 2,Bob,3750.00
/// # 1,Alice,2800.00
/// ```
///
/// Unknown query types yield 400, an empty result yields 404.
pub async fn export(
    Path(query_type): Path<String>,
    Query(params): Query<ExportParams>,
    State(state): State<AppState>,
) -> WebResult<Response> {
    let kind: QueryKind = query_type.parse()?;
    let query = params.into_query(kind)?;
    tracing::info!(?query, "Exporting query results");

    let records = collect_records(state.store.as_ref(), &query).await?;
    let csv = to_csv_string(&records)?;
    let file_name = query.file_name();
    write_csv(&csv, state.export_dir.join(&file_name)).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        Body::from(csv),
    )
        .into_response())
}

//! Profit report handlers

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use shared::models::{OrderProfitRow, OrderStatus, ProductProfitRow, ProfitSummary};

use crate::core::ServerState;
use crate::reports::{self, ProfitFilter};
use crate::utils::AppResult;
use crate::utils::time::parse_window_bound;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Window start: millis, RFC 3339 or YYYY-MM-DD
    pub from: Option<String>,
    /// Window end (exclusive)
    pub to: Option<String>,
    pub customer_id: Option<i64>,
    /// Restrict to one status; omitted = everything except cancelled
    pub status: Option<OrderStatus>,
}

impl ReportQuery {
    fn into_filter(self) -> AppResult<ProfitFilter> {
        Ok(ProfitFilter {
            from: self.from.as_deref().map(parse_window_bound).transpose()?,
            to: self.to.as_deref().map(parse_window_bound).transpose()?,
            customer_id: self.customer_id,
            status: self.status,
        })
    }
}

pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ProfitSummary>> {
    let filter = query.into_filter()?;
    Ok(Json(reports::summary(&state.pool, &filter).await?))
}

pub async fn consumption(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<ProductProfitRow>>> {
    let filter = query.into_filter()?;
    Ok(Json(reports::by_product(&state.pool, &filter).await?))
}

pub async fn by_order(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<OrderProfitRow>>> {
    let filter = query.into_filter()?;
    Ok(Json(reports::by_order(&state.pool, &filter).await?))
}

/// CSV download of the per-product rollup
pub async fn consumption_csv(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let filter = query.into_filter()?;
    let csv = reports::consumption_csv(&state.pool, &filter).await?;

    Ok((
        [
            (http::header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                http::header::CONTENT_DISPOSITION,
                "attachment; filename=\"consumption.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

//! Signal API endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::types::{SignalReport, Timeframe};
use crate::AppState;

/// Most symbols accepted by one batch request.
const MAX_BATCH_SYMBOLS: usize = 20;

/// API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Serialize)]
pub struct ApiMeta {
    pub cached: bool,
}

impl<T> ApiResponse<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            meta: ApiMeta { cached: false },
        }
    }
}

/// Query parameters for signals endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SignalsQuery {
    /// Candle interval: 1m, 5m, 15m, 30m, 1h, 4h, 1d, 1w, 1M
    pub timeframe: Option<String>,
    /// Number of candles to analyze.
    pub limit: Option<usize>,
}

/// Query parameters for the batch endpoint.
#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    /// Comma-separated symbols.
    pub symbols: String,
    pub timeframe: Option<String>,
    pub limit: Option<usize>,
}

/// Per-symbol entry of a batch response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SignalReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_batch_signals))
        .route("/:symbol", get(get_signals))
}

fn resolve(
    state: &AppState,
    timeframe: Option<&str>,
    limit: Option<usize>,
) -> Result<(Timeframe, usize)> {
    let timeframe = match timeframe {
        Some(tf) => Timeframe::from_str(tf).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid timeframe '{}'. Expected one of: {}",
                tf,
                Timeframe::ALL.map(|t| t.as_str()).join(", ")
            ))
        })?,
        None => state.config.default_timeframe,
    };
    let limit = limit.unwrap_or(state.config.default_limit);
    Ok((timeframe, limit))
}

/// Get the current signal for a symbol.
async fn get_signals(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<SignalsQuery>,
) -> Result<Json<ApiResponse<SignalReport>>> {
    let (timeframe, limit) = resolve(&state, query.timeframe.as_deref(), query.limit)?;
    let report = state
        .signal_service
        .analyze(&symbol, timeframe, limit)
        .await?;

    Ok(Json(ApiResponse::new(report)))
}

/// Get current signals for several symbols at once.
async fn get_batch_signals(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
) -> Result<Json<ApiResponse<Vec<BatchEntry>>>> {
    let (timeframe, limit) = resolve(&state, query.timeframe.as_deref(), query.limit)?;
    let symbols: Vec<String> = query
        .symbols
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if symbols.is_empty() {
        return Err(AppError::BadRequest("No symbols given".to_string()));
    }
    if symbols.len() > MAX_BATCH_SYMBOLS {
        return Err(AppError::BadRequest(format!(
            "At most {} symbols per request",
            MAX_BATCH_SYMBOLS
        )));
    }

    let entries = state
        .signal_service
        .analyze_many(&symbols, timeframe, limit)
        .await
        .into_iter()
        .map(|(symbol, result)| match result {
            Ok(report) => BatchEntry {
                symbol: report.symbol.clone(),
                report: Some(report),
                error: None,
            },
            Err(e) => BatchEntry {
                symbol: symbol.to_uppercase(),
                report: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    Ok(Json(ApiResponse::new(entries)))
}

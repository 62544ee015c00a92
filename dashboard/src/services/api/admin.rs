//! # Database Monitor Endpoints
//!
//! Query-statistics and vacuum monitor queries plus their two maintenance
//! actions. Actions are plain POSTs; the monitors re-fetch afterwards rather
//! than patching state optimistically.

use super::client::ApiClient;
use shared::dto::admin::{
    QueryStatsSummary, SlowQuery, SlowQueryFilters, TableStats, VacuumOutcome, VacuumRequest,
};
use shared::dto::auth::{ErrorResponse, StatusResponse};

/// Fetch the aggregate query statistics summary.
#[tracing::instrument(skip(client))]
pub async fn get_query_stats(client: &ApiClient) -> Result<QueryStatsSummary, String> {
    let url = client.url("/api/admin/query-stats");

    let response = client
        .authorize(client.http.get(&url))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<QueryStatsSummary>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(format!(
            "Failed to fetch query stats: {}",
            response.status()
        ))
    }
}

/// Fetch the slow-query report with the given filters.
#[tracing::instrument(skip(client), fields(limit = filters.limit))]
pub async fn get_slow_queries(
    client: &ApiClient,
    filters: SlowQueryFilters,
) -> Result<Vec<SlowQuery>, String> {
    let url = client.url(&format!(
        "/api/admin/slow-queries?min_mean_ms={}&min_calls={}&limit={}",
        filters.min_mean_ms, filters.min_calls, filters.limit
    ));

    let response = client
        .authorize(client.http.get(&url))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<Vec<SlowQuery>>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(format!(
            "Failed to fetch slow queries: {}",
            response.status()
        ))
    }
}

/// Reset the collected query statistics.
#[tracing::instrument(skip(client))]
pub async fn reset_query_stats(client: &ApiClient) -> Result<StatusResponse, String> {
    tracing::info!("Resetting query statistics");

    let response = client
        .authorize(client.http.post(client.url("/api/admin/query-stats/reset")))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Query stats reset network error");
            format!("Network error: {}", e)
        })?;

    let status = response.status();
    if status.is_success() {
        response
            .json::<StatusResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let error = response
            .json::<ErrorResponse>()
            .await
            .map_err(|e| format!("Failed to parse error: {}", e))?;

        tracing::warn!(status = status.as_u16(), error = %error.error, "Query stats reset failed");
        Err(error.error)
    }
}

/// Fetch per-table bloat statistics.
pub async fn get_table_stats(client: &ApiClient) -> Result<Vec<TableStats>, String> {
    let url = client.url("/api/admin/tables");

    let response = client
        .authorize(client.http.get(&url))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<Vec<TableStats>>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(format!(
            "Failed to fetch table stats: {}",
            response.status()
        ))
    }
}

/// Run VACUUM (optionally FULL) on one table.
#[tracing::instrument(skip(client), fields(table = %request.table, full = request.full))]
pub async fn run_vacuum(
    client: &ApiClient,
    request: VacuumRequest,
) -> Result<VacuumOutcome, String> {
    tracing::info!("Starting vacuum");
    let start = std::time::Instant::now();

    let response = client
        .authorize(client.http.post(client.url("/api/admin/vacuum")))
        .json(&request)
        // VACUUM FULL rewrites the table and can blow past the default client timeout
        .timeout(std::time::Duration::from_secs(120))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Vacuum network error");
            format!("Network error: {}", e)
        })?;

    let status = response.status();
    let duration = start.elapsed();

    if status.is_success() {
        let result = response.json::<VacuumOutcome>().await.map_err(|e| {
            tracing::error!(error = %e, "Vacuum response parse error");
            format!("Failed to parse response: {}", e)
        });

        if let Ok(ref outcome) = result {
            tracing::info!(
                duration_ms = duration.as_millis(),
                dead_tuples_before = outcome.dead_tuples_before,
                dead_tuples_after = outcome.dead_tuples_after,
                "Vacuum completed"
            );
        }
        result
    } else {
        let error = response
            .json::<ErrorResponse>()
            .await
            .map_err(|e| format!("Failed to parse error: {}", e))?;

        tracing::warn!(
            status = status.as_u16(),
            error = %error.error,
            duration_ms = duration.as_millis(),
            "Vacuum failed"
        );
        Err(error.error)
    }
}

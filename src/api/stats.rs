//! Statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::stats::CatalogStats};

/// Catalog summary for the dashboard
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog counts", body = CatalogStats)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<CatalogStats>> {
    let stats = state.services.stats.catalog().await?;
    Ok(Json(stats))
}

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use ohill_core::MenuDocument;
use serde::Deserialize;

use crate::cache::today_key;
use crate::middleware::RequestId;

use super::{map_scraper_error, ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct MenuQuery {
    pub(super) nocache: Option<String>,
}

impl MenuQuery {
    pub(super) fn bypass_cache(&self) -> bool {
        self.nocache.as_deref() == Some("1")
    }
}

/// The built menu document itself, not wrapped in the `data`/`meta` envelope.
pub(super) async fn get_menu(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<MenuDocument>, ApiError> {
    if query.bypass_cache() {
        let document = build(&state, &req_id).await?;
        return Ok(Json(document));
    }

    let key = today_key();
    if let Some(cached) = state.cache.get(&key).await {
        tracing::debug!(%key, "menu cache hit");
        return Ok(Json(MenuDocument::clone(&cached)));
    }

    let document = Arc::new(build(&state, &req_id).await?);
    state.cache.insert(key.clone(), Arc::clone(&document)).await;
    let entries = state.cache.entry_count().await;
    tracing::debug!(%key, entries, "menu cached");
    Ok(Json(MenuDocument::clone(&document)))
}

async fn build(state: &AppState, req_id: &RequestId) -> Result<MenuDocument, ApiError> {
    state
        .builder
        .build()
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))
}

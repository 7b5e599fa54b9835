use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Extension, Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{DiscoveryRequest, DiscoveryResponse},
    engine::{discover, DiscoveryQuery},
};
use crate::{auth::CallerIdentity, error::Result, state::AppState};

/// Discovery routes; they expect the session gate in front of them.
pub fn discovery_routes() -> Router<AppState> {
    // Browsers and some HTTP clients drop GET bodies, so POST is accepted too.
    Router::new().route("/strangee", get(find_strangers).post(find_strangers))
}

#[instrument(skip_all)]
pub async fn find_strangers(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    payload: std::result::Result<Json<DiscoveryRequest>, JsonRejection>,
) -> Result<Json<DiscoveryResponse>> {
    let Json(payload) = payload?;
    let query = DiscoveryQuery::try_from(payload)?;

    let page = discover(state.users.as_ref(), &caller, &query).await?;

    info!(
        user_id = %caller.id,
        level = ?page.level,
        count = page.candidates.len(),
        "strangers found"
    );
    Ok(Json(DiscoveryResponse {
        data: page.candidates,
    }))
}

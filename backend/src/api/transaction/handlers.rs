//! Handler functions for the transaction history API.

use crate::api::common::{ApiResponse, validation_error_response};
use crate::api::transaction::models::ResumeQuery;
use crate::server::AppState;
use crate::services::resume::ResumePage;
use crate::utils::handlers_common::{handle_node_error, resolve_node};
use crate::utils::jwt::Claims;
use axum::{
    Json,
    extract::{Extension, Query, State},
    http::StatusCode,
};
use validator::Validate;

/// Handler for one page of the merged payment and invoice history
#[axum::debug_handler]
pub async fn get_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ResumeQuery>,
) -> Result<Json<ApiResponse<ResumePage>>, (StatusCode, String)> {
    if let Err(validation_errors) = query.validate() {
        return Err(validation_error_response(validation_errors));
    }

    let node = resolve_node(&state.nodes, &claims)?;

    let page = state
        .resume
        .get_resume(node.as_ref(), query.token())
        .await
        .map_err(|e| handle_node_error(e, "get transaction resume"))?;

    tracing::info!(
        "Resume page for {} on node {}: {} entries, more: {}",
        claims.sub,
        claims.node_id,
        page.entries.len(),
        page.next_token().is_some()
    );

    Ok(Json(ApiResponse::success(
        page,
        "Transactions retrieved successfully",
    )))
}

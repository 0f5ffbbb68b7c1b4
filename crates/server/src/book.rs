//! Administrative endpoint moving the reading pointer.

use axum::extract::{Path, State};
use folio_widgets::set_current_book;
use std::sync::Arc;

use crate::{AppState, error::ApiError};

/// `GET /book/{id}`: point the now-reading widget at catalog book `id`.
///
/// A non-integer id is rejected by the path extractor with `400`.
pub(crate) async fn set_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<String, ApiError> {
    set_current_book(state.store.as_ref(), id).await?;
    Ok(format!("Currently reading {id}"))
}

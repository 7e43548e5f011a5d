//! Category deletion endpoint.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    category::{CategoryId, CategoryState, delete_category},
    extract::AppPath,
};

/// Handle category deletion. Categories that still contain items are not deleted.
pub async fn delete_category_endpoint(
    AppPath(category_id): AppPath<CategoryId>,
    State(state): State<CategoryState>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = delete_category(category_id, &connection)?;

    Ok(Json(json!({
        "message": format!("Category \"{}\" was deleted", category.name)
    })))
}

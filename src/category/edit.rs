//! Category update endpoint.

use axum::{Json, extract::State};

use crate::{
    Error,
    category::{
        Category, CategoryId, CategoryName, CategoryState, CategoryUpdate,
        domain::CategoryUpdateData, update_category,
    },
    extract::{AppJson, AppPath},
};

/// Handle a request to update a category's name and/or description.
pub async fn update_category_endpoint(
    AppPath(category_id): AppPath<CategoryId>,
    State(state): State<CategoryState>,
    AppJson(data): AppJson<CategoryUpdateData>,
) -> Result<Json<Category>, Error> {
    let update = CategoryUpdate {
        name: data
            .name
            .as_deref()
            .map(CategoryName::new)
            .transpose()?,
        description: data.description,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_category(category_id, update, &connection).map(Json)
}

#[cfg(test)]
mod update_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        ErrorKind,
        category::Category,
        endpoints::{self, format_endpoint},
        test_utils::{assert_error_kind, create_category_via_api, get_test_server},
    };

    #[tokio::test]
    async fn can_update_category() {
        let server = get_test_server();
        let category = create_category_via_api(&server, "Dairy").await;

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY, category.id))
            .json(&json!({ "navn": "Mejeri", "beskrivelse": "Mælk" }))
            .await;

        response.assert_status(StatusCode::OK);
        let updated = response.json::<Category>();
        assert_eq!(updated.id, category.id);
        assert_eq!(updated.name.as_ref(), "Mejeri");
        assert_eq!(updated.description.as_deref(), Some("Mælk"));
    }

    #[tokio::test]
    async fn update_fails_on_blank_name() {
        let server = get_test_server();
        let category = create_category_via_api(&server, "Dairy").await;

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY, category.id))
            .json(&json!({ "navn": "" }))
            .await;

        assert_error_kind(&response, ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn update_missing_category_returns_not_found() {
        let server = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY, 42))
            .json(&json!({ "navn": "Anything" }))
            .await;

        assert_error_kind(&response, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn update_with_non_numeric_id_is_a_validation_error() {
        let server = get_test_server();

        let response = server
            .put("/api/kategorier/abc")
            .json(&json!({ "navn": "Anything" }))
            .await;

        assert_error_kind(&response, ErrorKind::ValidationError);
    }
}

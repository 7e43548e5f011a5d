//! Category creation endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    Error,
    category::{Category, CategoryName, CategoryState, create_category, domain::NewCategoryData},
    extract::AppJson,
};

/// Handle a request to create a category.
///
/// Responds with `201 Created` and the new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    AppJson(new_category): AppJson<NewCategoryData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&new_category.name)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(name, new_category.description.as_deref(), &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        ErrorKind, category::Category, endpoints,
        test_utils::{assert_error_kind, get_test_server},
    };

    #[tokio::test]
    async fn can_create_category() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "navn": " Mejeriprodukter ", "beskrivelse": "Mælk, ost, yoghurt osv." }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let category = response.json::<Category>();
        assert_eq!(category.name.as_ref(), "Mejeriprodukter");
        assert_eq!(
            category.description.as_deref(),
            Some("Mælk, ost, yoghurt osv.")
        );
        assert_eq!(category.item_count, 0);
    }

    #[tokio::test]
    async fn create_category_fails_on_empty_name() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "navn": "   " }))
            .await;

        assert_error_kind(&response, ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn create_category_fails_on_missing_name() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "beskrivelse": "no name" }))
            .await;

        assert_error_kind(&response, ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn create_category_fails_on_malformed_json() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .text("{\"navn\": ")
            .content_type("application/json")
            .await;

        assert_error_kind(&response, ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn create_category_fails_on_duplicate_name() {
        let server = get_test_server();
        server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "navn": "Dairy" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "navn": "DAIRY" }))
            .await;

        assert_error_kind(&response, ErrorKind::Conflict);
    }
}

//! Category listing endpoints.

use axum::{Json, extract::State};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryState, get_all_categories, get_category},
    extract::AppPath,
};

/// List all categories with their item counts, ordered by name.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))
        .map(Json)
}

/// Get a single category with its item count.
pub async fn get_category_endpoint(
    AppPath(category_id): AppPath<CategoryId>,
    State(state): State<CategoryState>,
) -> Result<Json<Category>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_category(category_id, &connection).map(Json)
}

#[cfg(test)]
mod category_list_endpoint_tests {
    use axum::http::StatusCode;

    use crate::{
        category::Category,
        endpoints::{self, format_endpoint},
        test_utils::{create_category_via_api, get_test_server},
    };

    #[tokio::test]
    async fn lists_categories_by_name() {
        let server = get_test_server();
        create_category_via_api(&server, "Kød og Fisk").await;
        create_category_via_api(&server, "Brød og Korn").await;

        let response = server.get(endpoints::CATEGORIES).await;

        response.assert_status_ok();
        let names = response
            .json::<Vec<Category>>()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Brød og Korn", "Kød og Fisk"]);
    }

    #[tokio::test]
    async fn get_single_category() {
        let server = get_test_server();
        let category = create_category_via_api(&server, "Andet").await;

        let response = server
            .get(&format_endpoint(endpoints::CATEGORY, category.id))
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Category>(), category);
    }
}

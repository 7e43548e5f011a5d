//! Application router configuration.

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_category_endpoint, update_category_endpoint,
    },
    endpoints,
    item::{
        create_item_endpoint, delete_item_endpoint, get_item_endpoint,
        get_items_in_category_endpoint, search_items_endpoint, update_item_endpoint,
    },
    shopping_list::{
        add_to_list_endpoint, clear_purchased_endpoint, get_history_endpoint,
        get_list_entry_endpoint, get_shopping_list_endpoint, mark_purchased_endpoint,
        reactivate_endpoint, remove_list_entry_endpoint, update_list_entry_endpoint,
    },
    stats::get_stats_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let category_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        );

    let item_routes = Router::new()
        .route(
            endpoints::ITEMS,
            get(search_items_endpoint).post(create_item_endpoint),
        )
        .route(
            endpoints::ITEM,
            get(get_item_endpoint)
                .put(update_item_endpoint)
                .delete(delete_item_endpoint),
        )
        .route(
            endpoints::ITEMS_IN_CATEGORY,
            get(get_items_in_category_endpoint),
        );

    let shopping_list_routes = Router::new()
        .route(endpoints::SHOPPING_LIST, get(get_shopping_list_endpoint))
        .route(endpoints::ADD_TO_LIST, post(add_to_list_endpoint))
        .route(
            endpoints::LIST_ENTRY,
            get(get_list_entry_endpoint)
                .put(update_list_entry_endpoint)
                .delete(remove_list_entry_endpoint),
        )
        .route(endpoints::MARK_PURCHASED, post(mark_purchased_endpoint))
        .route(endpoints::REACTIVATE, post(reactivate_endpoint))
        .route(
            endpoints::CLEAR_PURCHASED,
            delete(clear_purchased_endpoint),
        )
        .route(endpoints::LIST_STATS, get(get_stats_endpoint))
        .route(endpoints::HISTORY, get(get_history_endpoint));

    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .merge(category_routes)
        .merge(item_routes)
        .merge(shopping_list_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Report that the server is up.
async fn get_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Huskeseddel API is running"
    }))
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

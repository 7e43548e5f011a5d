//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/varer/{item_id}', use [format_endpoint].

/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/kategorier";
/// The route to get, update and delete a single category.
pub const CATEGORY: &str = "/api/kategorier/{category_id}";

/// The route to search and create items.
pub const ITEMS: &str = "/api/varer";
/// The route to get, update and delete a single item.
pub const ITEM: &str = "/api/varer/{item_id}";
/// The route to list the items in a single category.
pub const ITEMS_IN_CATEGORY: &str = "/api/varer/kategori/{category_id}";

/// The route to get the shopping list.
pub const SHOPPING_LIST: &str = "/api/indkoebsliste";
/// The route to put an item on the shopping list.
pub const ADD_TO_LIST: &str = "/api/indkoebsliste/tilfoej";
/// The route to update the note of, or remove, a list entry.
pub const LIST_ENTRY: &str = "/api/indkoebsliste/{entry_id}";
/// The route to mark a list entry as purchased.
pub const MARK_PURCHASED: &str = "/api/indkoebsliste/{entry_id}/koeb";
/// The route to move a purchased list entry back to active.
pub const REACTIVATE: &str = "/api/indkoebsliste/{entry_id}/genaktiver";
/// The route to remove all purchased entries from the shopping list.
pub const CLEAR_PURCHASED: &str = "/api/indkoebsliste/ryd-koebte";
/// The route to get the shopping list statistics.
pub const LIST_STATS: &str = "/api/indkoebsliste/stats";
/// The route to get the purchase history.
pub const HISTORY: &str = "/api/indkoebsliste/historik";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/varer/{item_id}', '{item_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

//! The shopping list ledger and the purchase history.
//!
//! An item from the catalog is put on the list as an active entry. Entries are
//! marked as purchased when bought, which also records the purchase in the
//! history. Purchased entries can be reactivated, removed one by one, or
//! cleared all at once; the history is never changed by the list operations.

mod add;
mod db;
mod domain;
mod edit;
mod history;
mod list;
mod remove;
mod status;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use add::add_to_list_endpoint;
pub use db::{
    ListEntryUpdate, add_item_to_list, clear_purchased, create_shopping_list_tables,
    get_list_entry, get_purchase_history, get_shopping_list, mark_purchased, reactivate,
    remove_list_entry, update_list_entry,
};
pub use domain::{
    DEFAULT_HISTORY_LIMIT, HistoryRecord, ListEntry, ListEntryId, ListEntryStatus,
    MAX_HISTORY_LIMIT,
};
pub use edit::update_list_entry_endpoint;
pub use history::get_history_endpoint;
pub use list::{get_list_entry_endpoint, get_shopping_list_endpoint};
pub use remove::{clear_purchased_endpoint, remove_list_entry_endpoint};
pub use status::{mark_purchased_endpoint, reactivate_endpoint};

/// The state needed by the shopping list endpoints.
#[derive(Debug, Clone)]
pub struct ShoppingListState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ShoppingListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

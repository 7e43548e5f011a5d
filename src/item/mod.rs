//! The catalog of reusable items ("varer") that can be put on the shopping list.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod search;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use create::create_item_endpoint;
pub use db::{
    ItemUpdate, create_item, create_item_table, delete_item, get_item, get_items_in_category,
    search_items, update_item,
};
pub use delete::delete_item_endpoint;
pub use domain::{Item, ItemId, ItemName, NewItem};
pub use edit::update_item_endpoint;
pub use search::{get_item_endpoint, get_items_in_category_endpoint, search_items_endpoint};

/// The state needed by the item endpoints.
#[derive(Debug, Clone)]
pub struct ItemState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#![allow(missing_docs)]

pub(crate) mod http;

use rusqlite::Connection;

use crate::db::initialize;

pub(crate) use http::{
    add_to_list_via_api, assert_error_kind, create_category_via_api, create_item_via_api,
    get_test_server,
};

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

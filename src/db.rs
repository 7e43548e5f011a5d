//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, item::create_item_table,
    shopping_list::create_shopping_list_tables,
};

/// Create the tables for all the domain models if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection`, since the stores
/// rely on it to keep references between categories, items and list entries valid.
///
/// # Errors
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must be set outside of a transaction, SQLite ignores it otherwise.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_item_table(&transaction)?;
    create_shopping_list_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}

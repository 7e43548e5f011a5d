//! Database operations for items.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{CategoryId, get_category},
    item::{Item, ItemId, ItemName, NewItem},
    optional_text::normalize,
};

/// Selects items joined with their category name and whether they are on the
/// shopping list right now. Columns are in the order expected by [map_row].
const SELECT_ITEMS: &str = "SELECT i.id, i.name, i.category_id, c.name, i.note, i.created_at,
        EXISTS(SELECT 1 FROM list_entry e WHERE e.item_id = i.id AND e.status = 'active')
    FROM item i
    INNER JOIN category c ON c.id = i.category_id";

/// The fields to change on an existing item. `None` leaves a field as is.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemUpdate {
    pub name: Option<ItemName>,
    pub category_id: Option<CategoryId>,
    /// `Some(None)` removes the note.
    pub note: Option<Option<String>>,
}

/// Add an item to the catalog.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if the category ID does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_item(new_item: NewItem, connection: &Connection) -> Result<Item, Error> {
    connection
        .execute(
            "INSERT INTO item (name, category_id, note, created_at) VALUES (?1, ?2, ?3, ?4)",
            (
                new_item.name.as_ref(),
                new_item.category_id,
                &new_item.note,
                OffsetDateTime::now_utc(),
            ),
        )
        .map_err(|error| map_category_error(error, new_item.category_id))?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Created item {id} \"{}\"", new_item.name);

    get_item(id, connection)
}

/// Retrieve a single item by ID.
///
/// # Errors
/// This function will return a [Error::ItemNotFound] if `item_id` does not refer to an item.
pub fn get_item(item_id: ItemId, connection: &Connection) -> Result<Item, Error> {
    connection
        .prepare(&format!("{SELECT_ITEMS} WHERE i.id = :id"))?
        .query_row(&[(":id", &item_id)], map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::ItemNotFound(item_id),
            error => error.into(),
        })
}

/// Search the catalog.
///
/// An item matches if its name contains `query`, ignoring case, and, when
/// `category_ids` is not empty, its category is one of `category_ids`.
/// An empty `query` matches every name. Results are ordered by name.
///
/// Case folding is done here rather than in SQL since SQLite only folds ASCII
/// letters, and item names are often Danish ('Æbler', 'Løg').
pub fn search_items(
    query: &str,
    category_ids: &[CategoryId],
    connection: &Connection,
) -> Result<Vec<Item>, Error> {
    let needle = query.trim().to_lowercase();

    let items = connection
        .prepare(&format!(
            "{SELECT_ITEMS} ORDER BY i.name COLLATE NOCASE ASC, i.id ASC"
        ))?
        .query_map([], map_row)?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    Ok(items
        .into_iter()
        .filter(|item| category_ids.is_empty() || category_ids.contains(&item.category_id))
        .filter(|item| needle.is_empty() || item.name.as_ref().to_lowercase().contains(&needle))
        .collect())
}

/// Retrieve the items in a category, ordered by name.
///
/// # Errors
/// This function will return a [Error::CategoryNotFound] if `category_id` does not refer to a category.
pub fn get_items_in_category(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Vec<Item>, Error> {
    get_category(category_id, connection)?;

    search_items("", &[category_id], connection)
}

/// Update an item's name, category and/or note.
///
/// Moving an item to another category keeps its ID and list entries.
///
/// # Errors
/// This function will return a:
/// - [Error::ItemNotFound] if `item_id` does not refer to an item,
/// - [Error::CategoryNotFound] if the new category ID does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_item(
    item_id: ItemId,
    update: ItemUpdate,
    connection: &Connection,
) -> Result<Item, Error> {
    let current = get_item(item_id, connection)?;

    let name = update.name.unwrap_or(current.name);
    let category_id = update.category_id.unwrap_or(current.category_id);
    let note = match update.note {
        Some(note) => normalize(note.as_deref()),
        None => current.note,
    };

    connection
        .execute(
            "UPDATE item SET name = ?1, category_id = ?2, note = ?3 WHERE id = ?4",
            (name.as_ref(), category_id, note, item_id),
        )
        .map_err(|error| map_category_error(error, category_id))?;

    get_item(item_id, connection)
}

/// Delete an item that is not referenced by any shopping list entry and return the deleted item.
///
/// Entries count regardless of whether they are active or purchased. Purchase
/// history is kept.
///
/// # Errors
/// This function will return a:
/// - [Error::ItemNotFound] if `item_id` does not refer to an item,
/// - [Error::ItemOnList] if the item is referenced by a list entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_item(item_id: ItemId, connection: &Connection) -> Result<Item, Error> {
    let item = get_item(item_id, connection)?;

    let entry_count: u32 = connection.query_row(
        "SELECT COUNT(1) FROM list_entry WHERE item_id = ?1",
        [item_id],
        |row| row.get(0),
    )?;

    if entry_count > 0 {
        return Err(Error::ItemOnList(item.name.to_string()));
    }

    connection
        .execute("DELETE FROM item WHERE id = ?1", [item_id])
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::ItemOnList(item.name.to_string()),
            error => error.into(),
        })?;

    tracing::debug!("Deleted item {item_id} \"{}\"", item.name);

    Ok(item)
}

/// Initialize the item table and indexes.
pub fn create_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS item (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_item_category ON item(category_id);",
    )?;

    Ok(())
}

fn map_category_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::CategoryNotFound(category_id),
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Item, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let category_id = row.get(2)?;
    let category_name = row.get(3)?;
    let note = row.get(4)?;
    let created_at = row.get(5)?;
    let on_active_list = row.get(6)?;

    Ok(Item {
        id,
        name: ItemName::new_unchecked(&raw_name),
        category_id,
        category_name,
        note,
        created_at,
        on_active_list,
    })
}

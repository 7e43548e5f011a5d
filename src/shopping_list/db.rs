//! Database operations for the shopping list and purchase history.
//!
//! Operations that touch more than one row run inside a transaction so that a
//! failure never leaves a half-applied change behind. The rule that an item
//! has at most one active entry is enforced by a partial unique index, so it
//! holds even if two requests race.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    item::{ItemId, get_item},
    optional_text::normalize,
    shopping_list::{HistoryRecord, ListEntry, ListEntryId, ListEntryStatus},
};

/// Selects list entries joined with their item and category. Columns are in
/// the order expected by [map_entry_row].
const SELECT_ENTRIES: &str = "SELECT e.id, e.item_id, i.name, c.name, i.note, e.note, e.status,
        e.added_at, e.purchased_at
    FROM list_entry e
    INNER JOIN item i ON i.id = e.item_id
    INNER JOIN category c ON c.id = i.category_id";

/// The fields to change on a list entry. `None` leaves a field as is.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListEntryUpdate {
    /// `Some(None)` removes the note.
    pub note: Option<Option<String>>,
    /// Moving to another status follows the same rules as [mark_purchased] and [reactivate].
    pub status: Option<ListEntryStatus>,
}

/// Put an item on the shopping list as a new active entry.
///
/// # Errors
/// This function will return a:
/// - [Error::ItemNotFound] if `item_id` does not refer to an item,
/// - [Error::ItemAlreadyOnList] if the item already has an active entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn add_item_to_list(
    item_id: ItemId,
    note: Option<&str>,
    connection: &Connection,
) -> Result<ListEntry, Error> {
    let item = get_item(item_id, connection)?;

    connection
        .execute(
            "INSERT INTO list_entry (item_id, note, status, added_at) VALUES (?1, ?2, ?3, ?4)",
            (
                item_id,
                normalize(note),
                ListEntryStatus::Active,
                OffsetDateTime::now_utc(),
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::ItemAlreadyOnList(item.name.to_string()),
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::ItemNotFound(item_id),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Put item {item_id} \"{}\" on the shopping list as entry {id}", item.name);

    get_list_entry(id, connection)
}

/// Retrieve a single list entry by ID.
///
/// # Errors
/// This function will return a [Error::ListEntryNotFound] if `entry_id` does not refer to a list entry.
pub fn get_list_entry(entry_id: ListEntryId, connection: &Connection) -> Result<ListEntry, Error> {
    connection
        .prepare(&format!("{SELECT_ENTRIES} WHERE e.id = :id"))?
        .query_row(&[(":id", &entry_id)], map_entry_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::ListEntryNotFound(entry_id),
            error => error.into(),
        })
}

/// Retrieve every entry on the shopping list, active and purchased, in the
/// order they were put on the list.
pub fn get_shopping_list(connection: &Connection) -> Result<Vec<ListEntry>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ENTRIES} ORDER BY e.added_at ASC, e.id ASC"
        ))?
        .query_map([], map_entry_row)?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

/// Mark an active entry as purchased and record the purchase in the history.
///
/// # Errors
/// This function will return a:
/// - [Error::ListEntryNotFound] if `entry_id` does not refer to a list entry,
/// - [Error::EntryNotActive] if the entry has already been purchased,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn mark_purchased(entry_id: ListEntryId, connection: &Connection) -> Result<ListEntry, Error> {
    let transaction = connection.unchecked_transaction()?;
    let entry = get_list_entry(entry_id, &transaction)?;
    set_purchased(&entry, &transaction)?;
    transaction.commit()?;

    get_list_entry(entry_id, connection)
}

/// Move a purchased entry back to active.
///
/// The entry keeps the time it was first added. The purchase history is not changed.
///
/// # Errors
/// This function will return a:
/// - [Error::ListEntryNotFound] if `entry_id` does not refer to a list entry,
/// - [Error::EntryNotPurchased] if the entry is already active,
/// - [Error::ItemAlreadyOnList] if the item has been put on the list again in the meantime,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn reactivate(entry_id: ListEntryId, connection: &Connection) -> Result<ListEntry, Error> {
    let transaction = connection.unchecked_transaction()?;
    let entry = get_list_entry(entry_id, &transaction)?;
    set_active(&entry, &transaction)?;
    transaction.commit()?;

    get_list_entry(entry_id, connection)
}

/// Change the note and/or status of a list entry.
///
/// All changes are applied together or not at all.
///
/// # Errors
/// This function will return a:
/// - [Error::ListEntryNotFound] if `entry_id` does not refer to a list entry,
/// - [Error::ItemAlreadyOnList] if reactivating the entry would put the item on the list twice,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_list_entry(
    entry_id: ListEntryId,
    update: ListEntryUpdate,
    connection: &Connection,
) -> Result<ListEntry, Error> {
    let transaction = connection.unchecked_transaction()?;
    let entry = get_list_entry(entry_id, &transaction)?;

    if let Some(note) = update.note {
        transaction.execute(
            "UPDATE list_entry SET note = ?1 WHERE id = ?2",
            (normalize(note.as_deref()), entry_id),
        )?;
    }

    match (update.status, entry.status) {
        (Some(ListEntryStatus::Purchased), ListEntryStatus::Active) => {
            set_purchased(&entry, &transaction)?
        }
        (Some(ListEntryStatus::Active), ListEntryStatus::Purchased) => {
            set_active(&entry, &transaction)?
        }
        _ => {}
    }

    transaction.commit()?;

    get_list_entry(entry_id, connection)
}

/// Remove a single entry from the shopping list, whatever its status, and return the removed entry.
///
/// # Errors
/// This function will return a:
/// - [Error::ListEntryNotFound] if `entry_id` does not refer to a list entry,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn remove_list_entry(
    entry_id: ListEntryId,
    connection: &Connection,
) -> Result<ListEntry, Error> {
    let entry = get_list_entry(entry_id, connection)?;

    connection.execute("DELETE FROM list_entry WHERE id = ?1", [entry_id])?;
    tracing::debug!("Removed list entry {entry_id} \"{}\"", entry.item_name);

    Ok(entry)
}

/// Remove every purchased entry from the shopping list and return how many were removed.
///
/// Active entries and the purchase history are left alone.
pub fn clear_purchased(connection: &Connection) -> Result<usize, Error> {
    let removed = connection.execute(
        "DELETE FROM list_entry WHERE status = ?1",
        [ListEntryStatus::Purchased],
    )?;
    tracing::debug!("Cleared {removed} purchased entries from the shopping list");

    Ok(removed)
}

/// Retrieve up to `limit` purchases, newest first.
pub fn get_purchase_history(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<HistoryRecord>, Error> {
    connection
        .prepare(
            "SELECT id, item_id, item_name, category_name, purchased_at
            FROM purchase_history
            ORDER BY purchased_at DESC, id DESC
            LIMIT ?1",
        )?
        .query_map([limit], |row| {
            Ok(HistoryRecord {
                id: row.get(0)?,
                item_id: row.get(1)?,
                item_name: row.get(2)?,
                category_name: row.get(3)?,
                purchased_at: row.get(4)?,
            })
        })?
        .map(|maybe_record| maybe_record.map_err(Error::from))
        .collect()
}

/// Initialize the shopping list and purchase history tables.
///
/// The history has no foreign keys so that it outlives the items and
/// categories it mentions.
pub fn create_shopping_list_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS list_entry (
            id INTEGER PRIMARY KEY,
            item_id INTEGER NOT NULL,
            note TEXT,
            status TEXT NOT NULL CHECK (status IN ('active', 'purchased')),
            added_at TEXT NOT NULL,
            purchased_at TEXT,
            CHECK ((status = 'purchased') = (purchased_at IS NOT NULL)),
            FOREIGN KEY(item_id) REFERENCES item(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_list_entry_one_active_per_item
            ON list_entry(item_id) WHERE status = 'active';

        CREATE TABLE IF NOT EXISTS purchase_history (
            id INTEGER PRIMARY KEY,
            list_entry_id INTEGER NOT NULL,
            item_id INTEGER NOT NULL,
            item_name TEXT NOT NULL,
            category_name TEXT NOT NULL,
            purchased_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_purchase_history_purchased_at
            ON purchase_history(purchased_at);",
    )?;

    Ok(())
}

/// Expects to be called inside a transaction.
fn set_purchased(entry: &ListEntry, connection: &Connection) -> Result<(), Error> {
    if entry.status != ListEntryStatus::Active {
        return Err(Error::EntryNotActive(entry.id));
    }

    let purchased_at = OffsetDateTime::now_utc();

    connection.execute(
        "UPDATE list_entry SET status = ?1, purchased_at = ?2 WHERE id = ?3",
        (ListEntryStatus::Purchased, purchased_at, entry.id),
    )?;
    connection.execute(
        "INSERT INTO purchase_history (list_entry_id, item_id, item_name, category_name, purchased_at)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            entry.id,
            entry.item_id,
            &entry.item_name,
            &entry.category_name,
            purchased_at,
        ),
    )?;

    tracing::debug!("Marked list entry {} \"{}\" as purchased", entry.id, entry.item_name);

    Ok(())
}

/// Expects to be called inside a transaction.
fn set_active(entry: &ListEntry, connection: &Connection) -> Result<(), Error> {
    if entry.status != ListEntryStatus::Purchased {
        return Err(Error::EntryNotPurchased(entry.id));
    }

    connection
        .execute(
            "UPDATE list_entry SET status = ?1, purchased_at = NULL WHERE id = ?2",
            (ListEntryStatus::Active, entry.id),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::ItemAlreadyOnList(entry.item_name.clone()),
            error => error.into(),
        })?;

    tracing::debug!("Reactivated list entry {} \"{}\"", entry.id, entry.item_name);

    Ok(())
}

fn map_entry_row(row: &Row) -> Result<ListEntry, rusqlite::Error> {
    Ok(ListEntry {
        id: row.get(0)?,
        item_id: row.get(1)?,
        item_name: row.get(2)?,
        category_name: row.get(3)?,
        item_note: row.get(4)?,
        note: row.get(5)?,
        status: row.get(6)?,
        added_at: row.get(7)?,
        purchased_at: row.get(8)?,
    })
}

#[cfg(test)]
mod shopping_list_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{CategoryName, CategoryUpdate, create_category, update_category},
        item::{Item, ItemName, ItemUpdate, create_item, update_item},
        shopping_list::{
            ListEntryStatus, ListEntryUpdate, add_item_to_list, clear_purchased, get_list_entry,
            get_purchase_history, get_shopping_list, mark_purchased, reactivate,
            remove_list_entry, update_list_entry,
        },
        test_utils::get_test_connection,
    };

    /// Creates a category called "Dairy" and one item per name in it.
    fn create_test_items(names: &[&str], connection: &Connection) -> Vec<Item> {
        let dairy = create_category(CategoryName::new_unchecked("Dairy"), None, connection)
            .expect("Could not create test category");

        names
            .iter()
            .map(|name| {
                create_item(
                    Item::build(ItemName::new_unchecked(name), dairy.id),
                    connection,
                )
                .expect("Could not create test item")
            })
            .collect()
    }

    #[test]
    fn add_item_creates_active_entry() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);

        let entry = add_item_to_list(items[0].id, Some(" 2 liters "), &connection)
            .expect("Could not add item to list");

        assert_eq!(entry.item_id, items[0].id);
        assert_eq!(entry.item_name, "Milk");
        assert_eq!(entry.category_name, "Dairy");
        assert_eq!(entry.note.as_deref(), Some("2 liters"));
        assert_eq!(entry.status, ListEntryStatus::Active);
        assert_eq!(entry.purchased_at, None);
    }

    #[test]
    fn add_missing_item_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            add_item_to_list(7, None, &connection),
            Err(Error::ItemNotFound(7))
        );
    }

    #[test]
    fn add_item_twice_is_rejected() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        add_item_to_list(items[0].id, None, &connection).unwrap();

        let result = add_item_to_list(items[0].id, None, &connection);

        assert_eq!(result, Err(Error::ItemAlreadyOnList("Milk".to_owned())));
        assert_eq!(get_shopping_list(&connection).unwrap().len(), 1);
    }

    #[test]
    fn add_item_again_after_purchase_creates_new_entry() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let first = add_item_to_list(items[0].id, None, &connection).unwrap();
        mark_purchased(first.id, &connection).unwrap();

        let second = add_item_to_list(items[0].id, None, &connection).unwrap();

        assert_ne!(first.id, second.id);
        let statuses = get_shopping_list(&connection)
            .unwrap()
            .iter()
            .map(|entry| entry.status)
            .collect::<Vec<_>>();
        assert_eq!(
            statuses,
            vec![ListEntryStatus::Purchased, ListEntryStatus::Active]
        );
    }

    #[test]
    fn shopping_list_is_ordered_by_time_added() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk", "Butter", "Cheese"], &connection);
        for item in [&items[2], &items[0], &items[1]] {
            add_item_to_list(item.id, None, &connection).unwrap();
        }

        let names = get_shopping_list(&connection)
            .unwrap()
            .into_iter()
            .map(|entry| entry.item_name)
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Cheese", "Milk", "Butter"]);
    }

    #[test]
    fn mark_purchased_sets_status_and_records_history() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let entry = add_item_to_list(items[0].id, None, &connection).unwrap();

        let purchased = mark_purchased(entry.id, &connection).expect("Could not mark purchased");

        assert_eq!(purchased.status, ListEntryStatus::Purchased);
        assert_eq!(purchased.added_at, entry.added_at);
        let purchased_at = purchased.purchased_at.expect("purchased_at should be set");
        let history = get_purchase_history(10, &connection).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item_id, items[0].id);
        assert_eq!(history[0].item_name, "Milk");
        assert_eq!(history[0].category_name, "Dairy");
        assert_eq!(history[0].purchased_at, purchased_at);
    }

    #[test]
    fn mark_purchased_twice_fails_without_new_history() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let entry = add_item_to_list(items[0].id, None, &connection).unwrap();
        mark_purchased(entry.id, &connection).unwrap();

        let result = mark_purchased(entry.id, &connection);

        assert_eq!(result, Err(Error::EntryNotActive(entry.id)));
        assert_eq!(get_purchase_history(10, &connection).unwrap().len(), 1);
    }

    #[test]
    fn mark_missing_entry_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            mark_purchased(4, &connection),
            Err(Error::ListEntryNotFound(4))
        );
    }

    #[test]
    fn reactivate_keeps_added_at_and_history() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let entry = add_item_to_list(items[0].id, None, &connection).unwrap();
        mark_purchased(entry.id, &connection).unwrap();

        let reactivated = reactivate(entry.id, &connection).expect("Could not reactivate");

        assert_eq!(reactivated.status, ListEntryStatus::Active);
        assert_eq!(reactivated.purchased_at, None);
        assert_eq!(reactivated.added_at, entry.added_at);
        assert_eq!(get_purchase_history(10, &connection).unwrap().len(), 1);
    }

    #[test]
    fn reactivate_active_entry_fails() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let entry = add_item_to_list(items[0].id, None, &connection).unwrap();

        assert_eq!(
            reactivate(entry.id, &connection),
            Err(Error::EntryNotPurchased(entry.id))
        );
    }

    #[test]
    fn reactivate_fails_when_item_is_already_active_again() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let old = add_item_to_list(items[0].id, None, &connection).unwrap();
        mark_purchased(old.id, &connection).unwrap();
        add_item_to_list(items[0].id, None, &connection).unwrap();

        let result = reactivate(old.id, &connection);

        assert_eq!(result, Err(Error::ItemAlreadyOnList("Milk".to_owned())));
        assert_eq!(
            get_list_entry(old.id, &connection).unwrap().status,
            ListEntryStatus::Purchased
        );
    }

    #[test]
    fn update_entry_note() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let entry = add_item_to_list(items[0].id, Some("1 liter"), &connection).unwrap();

        let updated = update_list_entry(
            entry.id,
            ListEntryUpdate {
                note: Some(Some("2 liters".to_owned())),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();
        assert_eq!(updated.note.as_deref(), Some("2 liters"));
        assert_eq!(updated.status, ListEntryStatus::Active);

        let cleared = update_list_entry(
            entry.id,
            ListEntryUpdate {
                note: Some(Some("   ".to_owned())),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();
        assert_eq!(cleared.note, None);
    }

    #[test]
    fn update_entry_status_records_history() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let entry = add_item_to_list(items[0].id, None, &connection).unwrap();

        let updated = update_list_entry(
            entry.id,
            ListEntryUpdate {
                status: Some(ListEntryStatus::Purchased),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.status, ListEntryStatus::Purchased);
        assert_eq!(get_purchase_history(10, &connection).unwrap().len(), 1);
    }

    #[test]
    fn failed_update_changes_nothing() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let old = add_item_to_list(items[0].id, Some("old"), &connection).unwrap();
        mark_purchased(old.id, &connection).unwrap();
        add_item_to_list(items[0].id, None, &connection).unwrap();

        let result = update_list_entry(
            old.id,
            ListEntryUpdate {
                note: Some(Some("new".to_owned())),
                status: Some(ListEntryStatus::Active),
            },
            &connection,
        );

        assert_eq!(result, Err(Error::ItemAlreadyOnList("Milk".to_owned())));
        assert_eq!(
            get_list_entry(old.id, &connection).unwrap().note.as_deref(),
            Some("old")
        );
    }

    #[test]
    fn remove_entry_succeeds() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let entry = add_item_to_list(items[0].id, None, &connection).unwrap();

        assert_eq!(remove_list_entry(entry.id, &connection), Ok(entry.clone()));
        assert_eq!(
            get_list_entry(entry.id, &connection),
            Err(Error::ListEntryNotFound(entry.id))
        );
    }

    #[test]
    fn remove_missing_entry_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            remove_list_entry(2, &connection),
            Err(Error::ListEntryNotFound(2))
        );
    }

    #[test]
    fn clear_purchased_keeps_active_entries_and_history() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk", "Butter", "Cheese"], &connection);
        let entries = items
            .iter()
            .map(|item| add_item_to_list(item.id, None, &connection).unwrap())
            .collect::<Vec<_>>();
        mark_purchased(entries[0].id, &connection).unwrap();
        mark_purchased(entries[2].id, &connection).unwrap();

        let removed = clear_purchased(&connection).unwrap();

        assert_eq!(removed, 2);
        let remaining = get_shopping_list(&connection).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, entries[1].id);
        assert_eq!(get_purchase_history(10, &connection).unwrap().len(), 2);
        assert_eq!(clear_purchased(&connection).unwrap(), 0);
    }

    #[test]
    fn history_is_newest_first_and_limited() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk", "Butter", "Cheese"], &connection);
        for item in &items {
            let entry = add_item_to_list(item.id, None, &connection).unwrap();
            mark_purchased(entry.id, &connection).unwrap();
        }

        let history = get_purchase_history(2, &connection).unwrap();

        let names = history
            .iter()
            .map(|record| record.item_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Cheese", "Butter"]);
    }

    #[test]
    fn history_keeps_names_from_time_of_purchase() {
        let connection = get_test_connection();
        let items = create_test_items(&["Milk"], &connection);
        let entry = add_item_to_list(items[0].id, None, &connection).unwrap();
        mark_purchased(entry.id, &connection).unwrap();

        update_item(
            items[0].id,
            ItemUpdate {
                name: Some(ItemName::new_unchecked("Oat milk")),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();
        update_category(
            items[0].category_id,
            CategoryUpdate {
                name: Some(CategoryName::new_unchecked("Plant based")),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        let history = get_purchase_history(10, &connection).unwrap();
        assert_eq!(history[0].item_name, "Milk");
        assert_eq!(history[0].category_name, "Dairy");
        // The list itself shows the current names.
        let entry = get_list_entry(entry.id, &connection).unwrap();
        assert_eq!(entry.item_name, "Oat milk");
        assert_eq!(entry.category_name, "Plant based");
    }
}

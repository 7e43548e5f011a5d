//! Database operations for categories.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    optional_text::normalize,
};

/// The fields to change on an existing category. `None` leaves a field as is.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CategoryUpdate {
    pub name: Option<CategoryName>,
    /// `Some(None)` removes the description.
    pub description: Option<Option<String>>,
}

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name (ignoring case) exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    description: Option<&str>,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, name_key, description, created_at) VALUES (?1, ?2, ?3, ?4);",
            (
                name.as_ref(),
                name.key(),
                normalize(description),
                OffsetDateTime::now_utc(),
            ),
        )
        .map_err(|error| map_duplicate_name_error(error, &name))?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Created category {id} \"{name}\"");

    get_category(id, connection)
}

/// Retrieve a single category by ID, including its item count.
///
/// # Errors
/// This function will return a [Error::CategoryNotFound] if `category_id` does not refer to a category.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT c.id, c.name, c.description, c.created_at, COUNT(i.id)
             FROM category c
             LEFT JOIN item i ON i.category_id = c.id
             WHERE c.id = :id
             GROUP BY c.id;",
        )?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound(category_id),
            error => error.into(),
        })
}

/// Retrieve all categories with their item counts, ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.name, c.description, c.created_at, COUNT(i.id)
             FROM category c
             LEFT JOIN item i ON i.category_id = c.id
             GROUP BY c.id
             ORDER BY c.name COLLATE NOCASE ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update the name and/or description of a category.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `category_id` does not refer to a category,
/// - [Error::DuplicateCategoryName] if the new name is used by another category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    category_id: CategoryId,
    update: CategoryUpdate,
    connection: &Connection,
) -> Result<Category, Error> {
    let current = get_category(category_id, connection)?;

    let name = update.name.unwrap_or(current.name);
    let description = match update.description {
        Some(description) => normalize(description.as_deref()),
        None => current.description,
    };

    connection
        .execute(
            "UPDATE category SET name = ?1, name_key = ?2, description = ?3 WHERE id = ?4",
            (name.as_ref(), name.key(), description, category_id),
        )
        .map_err(|error| map_duplicate_name_error(error, &name))?;

    get_category(category_id, connection)
}

/// Delete a category that has no items and return the deleted category.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `category_id` does not refer to a category,
/// - [Error::CategoryHasItems] if any item still belongs to the category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    let category = get_category(category_id, connection)?;

    if category.item_count > 0 {
        return Err(Error::CategoryHasItems {
            name: category.name.to_string(),
            item_count: category.item_count,
        });
    }

    connection
        .execute("DELETE FROM category WHERE id = ?1", [category_id])
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::CategoryHasItems {
                name: category.name.to_string(),
                item_count: category.item_count,
            },
            error => error.into(),
        })?;

    tracing::debug!("Deleted category {category_id} \"{}\"", category.name);

    Ok(category)
}

/// Initialize the category table.
///
/// Names are unique regardless of letter case. SQLite's `NOCASE` only folds
/// ASCII, so uniqueness is enforced on `name_key`, see [CategoryName::key].
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_duplicate_name_error(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let description = row.get(2)?;
    let created_at = row.get(3)?;
    let item_count = row.get(4)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        description,
        created_at,
        item_count,
    })
}

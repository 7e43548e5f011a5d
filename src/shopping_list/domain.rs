//! Core shopping list domain types.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{database_id::DatabaseId, item::ItemId, optional_text::deserialize_present};

/// Database identifier for a shopping list entry.
pub type ListEntryId = DatabaseId;

/// How many history records are returned when the client does not ask for a specific number.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// The largest number of history records that can be requested at once.
pub const MAX_HISTORY_LIMIT: u32 = 500;

/// Where a list entry is in its lifecycle.
///
/// An entry starts out active. Marking it as purchased and reactivating it
/// moves it back and forth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListEntryStatus {
    /// Still needs to be bought.
    #[serde(rename = "aktiv")]
    Active,
    /// Has been bought.
    #[serde(rename = "koebt")]
    Purchased,
}

impl ListEntryStatus {
    /// The value stored in the database for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            ListEntryStatus::Active => "active",
            ListEntryStatus::Purchased => "purchased",
        }
    }
}

impl ToSql for ListEntryStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for ListEntryStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "active" => Ok(ListEntryStatus::Active),
            "purchased" => Ok(ListEntryStatus::Purchased),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An item's occurrence on the shopping list, joined with the item and category names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: ListEntryId,
    #[serde(rename = "vare_id")]
    pub item_id: ItemId,
    #[serde(rename = "vare_navn")]
    pub item_name: String,
    #[serde(rename = "kategori_navn")]
    pub category_name: String,
    /// The item's note from the catalog.
    #[serde(rename = "note_vareregister")]
    pub item_note: Option<String>,
    /// A note for this trip only, e.g. "2 liters".
    #[serde(rename = "note_liste")]
    pub note: Option<String>,
    pub status: ListEntryStatus,
    #[serde(rename = "tilfoejelsesdato", with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    /// Set only while the entry is purchased.
    #[serde(rename = "koebt_dato", with = "time::serde::rfc3339::option")]
    pub purchased_at: Option<OffsetDateTime>,
}

/// An immutable record of a past purchase.
///
/// The names are copied when the purchase happens, so the record stays
/// readable after the item or its category is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: DatabaseId,
    #[serde(rename = "vare_id")]
    pub item_id: ItemId,
    #[serde(rename = "vare_navn")]
    pub item_name: String,
    #[serde(rename = "kategori_navn")]
    pub category_name: String,
    #[serde(rename = "koebt_dato", with = "time::serde::rfc3339")]
    pub purchased_at: OffsetDateTime,
}

/// Request body for putting an item on the shopping list.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddToListData {
    #[serde(rename = "vare_id")]
    pub item_id: ItemId,
    #[serde(rename = "note_liste", default)]
    pub note: Option<String>,
}

/// Request body for updating a list entry. Missing fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ListEntryUpdateData {
    /// `null` or a blank string removes the note.
    #[serde(
        rename = "note_liste",
        default,
        deserialize_with = "deserialize_present"
    )]
    pub note: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<ListEntryStatus>,
}

/// Query string for the purchase history, e.g. `?limit=20`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

#[cfg(test)]
mod status_tests {
    use rusqlite::Connection;

    use super::ListEntryStatus;

    #[test]
    fn status_round_trips_through_sql() {
        let connection = Connection::open_in_memory().unwrap();

        for status in [ListEntryStatus::Active, ListEntryStatus::Purchased] {
            let got: ListEntryStatus = connection
                .query_row("SELECT ?1", [status], |row| row.get(0))
                .unwrap();

            assert_eq!(got, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let connection = Connection::open_in_memory().unwrap();

        let result: Result<ListEntryStatus, _> =
            connection.query_row("SELECT 'lost'", [], |row| row.get(0));

        assert!(result.is_err());
    }

    #[test]
    fn status_uses_danish_names_in_json() {
        assert_eq!(
            serde_json::to_string(&ListEntryStatus::Purchased).unwrap(),
            "\"koebt\""
        );
        assert_eq!(
            serde_json::from_str::<ListEntryStatus>("\"aktiv\"").unwrap(),
            ListEntryStatus::Active
        );
    }
}

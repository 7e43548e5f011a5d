//! Core item domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    category::CategoryId,
    database_id::DatabaseId,
    optional_text::{deserialize_present, normalize},
};

/// A validated, non-empty item name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ItemName(String);

impl ItemName {
    /// Create an item name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyItemName] if `name` is empty or just whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyItemName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create an item name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemName::new(s)
    }
}

impl Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for an item.
pub type ItemId = DatabaseId;

/// An item in the catalog, joined with its category name.
///
/// Items are reused across shopping trips: putting an item on the shopping list
/// creates a list entry that refers to the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "navn")]
    pub name: ItemName,
    #[serde(rename = "kategori_id")]
    pub category_id: CategoryId,
    #[serde(rename = "kategori_navn")]
    pub category_name: String,
    /// A note that is kept with the item in the catalog, e.g. a preferred brand.
    #[serde(rename = "note_vareregister")]
    pub note: Option<String>,
    #[serde(rename = "oprettelsesdato", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Whether the item currently has an active entry on the shopping list.
    ///
    /// Computed when the item is read, never stored.
    #[serde(rename = "paa_liste")]
    pub on_active_list: bool,
}

impl Item {
    /// Create a new item.
    ///
    /// Shortcut for [NewItem] for discoverability.
    pub fn build(name: ItemName, category_id: CategoryId) -> NewItem {
        NewItem {
            name,
            category_id,
            note: None,
        }
    }
}

/// The fields needed to add an item to the catalog.
///
/// ```ignore
/// let milk = create_item(
///     Item::build(ItemName::new("Mælk")?, dairy.id).note(Some("Letmælk 1,5%")),
///     &connection,
/// )?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: ItemName,
    pub category_id: CategoryId,
    pub note: Option<String>,
}

impl NewItem {
    /// Set the catalog note. Blank notes are dropped.
    pub fn note(mut self, note: Option<&str>) -> Self {
        self.note = normalize(note);
        self
    }
}

/// Request body for creating an item.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewItemData {
    #[serde(rename = "navn", default)]
    pub name: String,
    #[serde(rename = "kategori_id")]
    pub category_id: CategoryId,
    #[serde(rename = "note_vareregister", default)]
    pub note: Option<String>,
}

/// Request body for updating an item. Missing fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ItemUpdateData {
    #[serde(rename = "navn", default)]
    pub name: Option<String>,
    #[serde(rename = "kategori_id", default)]
    pub category_id: Option<CategoryId>,
    /// `null` or a blank string removes the note.
    #[serde(
        rename = "note_vareregister",
        default,
        deserialize_with = "deserialize_present"
    )]
    pub note: Option<Option<String>>,
}

/// Query string for searching the catalog, e.g. `?q=mæl&kategori_id=1&kategori_id=3`.
#[derive(Debug, Default, Deserialize)]
pub struct ItemSearchParams {
    /// Case-insensitive text to look for in item names.
    #[serde(default)]
    pub q: String,
    /// Only include items in one of these categories. Empty means all categories.
    #[serde(rename = "kategori_id", default)]
    pub category_ids: Vec<CategoryId>,
}

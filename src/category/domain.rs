//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId, optional_text::deserialize_present};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or just whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The name folded to lowercase, used to compare names regardless of case.
    ///
    /// Unlike SQLite's `NOCASE` this folds every letter, e.g. 'Æ' and 'æ'.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A named grouping for items, e.g. 'Mejeriprodukter' or 'Frugt og Grønt'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "navn")]
    pub name: CategoryName,
    #[serde(rename = "beskrivelse")]
    pub description: Option<String>,
    #[serde(rename = "oprettelsesdato", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The number of items in the catalog that belong to this category.
    #[serde(rename = "antal_varer")]
    pub item_count: u32,
}

/// Request body for creating a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewCategoryData {
    #[serde(rename = "navn", default)]
    pub name: String,
    #[serde(rename = "beskrivelse", default)]
    pub description: Option<String>,
}

/// Request body for updating a category. Missing fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryUpdateData {
    #[serde(rename = "navn", default)]
    pub name: Option<String>,
    /// `null` or a blank string removes the description.
    #[serde(
        rename = "beskrivelse",
        default,
        deserialize_with = "deserialize_present"
    )]
    pub description: Option<Option<String>>,
}

//! Huskeseddel is a household shopping list service.
//!
//! The service keeps a reusable catalog of items ("varer") grouped into
//! categories, and a single shopping list built from that catalog. Entries on
//! the list move between active and purchased, and every purchase is recorded
//! in an append-only history.
//!
//! This library provides a JSON REST API over a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod category;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod item;
mod logging;
mod optional_text;
mod routing;
mod sample_data;
mod shopping_list;
mod stats;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;
pub use sample_data::insert_sample_data;

use crate::{category::CategoryId, item::ItemId, shopping_list::ListEntryId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used to create an item name.
    #[error("Item name cannot be empty")]
    EmptyItemName,

    /// The request body, path or query string could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested history limit was outside of the allowed range.
    #[error("the history limit must be between 1 and {max}, got {got}")]
    InvalidHistoryLimit {
        /// The limit that was requested.
        got: u32,
        /// The largest limit that is allowed.
        max: u32,
    },

    /// The request body was larger than the server accepts.
    #[error("the request body is larger than the limit of {limit} bytes")]
    RequestBodyTooLarge {
        /// The largest accepted body size in bytes.
        limit: usize,
    },

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The category ID did not match a category in the database.
    #[error("could not find a category with the ID {0}")]
    CategoryNotFound(CategoryId),

    /// The item ID did not match an item in the database.
    #[error("could not find an item with the ID {0}")]
    ItemNotFound(ItemId),

    /// The list entry ID did not match an entry on the shopping list.
    #[error("could not find a shopping list entry with the ID {0}")]
    ListEntryNotFound(ListEntryId),

    /// Tried to mark an entry as purchased that is not active.
    #[error("could not find an active shopping list entry with the ID {0}")]
    EntryNotActive(ListEntryId),

    /// Tried to reactivate an entry that has not been purchased.
    #[error("could not find a purchased shopping list entry with the ID {0}")]
    EntryNotPurchased(ListEntryId),

    /// The category name is already used by another category.
    ///
    /// Names are compared case-insensitively.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// Tried to delete a category that still has items.
    #[error("the category \"{name}\" cannot be deleted because it contains {item_count} item(s)")]
    CategoryHasItems {
        /// The name of the category.
        name: String,
        /// The number of items in the category.
        item_count: u32,
    },

    /// Tried to delete an item that is referenced by the shopping list.
    #[error("the item \"{0}\" cannot be deleted because it is on the shopping list")]
    ItemOnList(String),

    /// Tried to put an item on the shopping list while it already has an active entry.
    #[error("the item \"{0}\" is already on the shopping list")]
    ItemAlreadyOnList(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

/// The machine-readable category of an [Error] that is sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was missing or malformed. The request should not be retried as is.
    ValidationError,
    /// An ID did not resolve in the targeted store.
    NotFound,
    /// The request would violate a uniqueness or referential integrity rule.
    Conflict,
    /// The request body was too large to be read.
    PayloadTooLarge,
    /// Something went wrong on the server.
    InternalError,
}

impl ErrorKind {
    /// The HTTP status code used for responses of this kind.
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Error {
    /// The kind of error to report to the client.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyCategoryName
            | Error::EmptyItemName
            | Error::InvalidRequest(_)
            | Error::InvalidHistoryLimit { .. } => ErrorKind::ValidationError,
            Error::NotFound
            | Error::CategoryNotFound(_)
            | Error::ItemNotFound(_)
            | Error::ListEntryNotFound(_)
            | Error::EntryNotActive(_)
            | Error::EntryNotPurchased(_) => ErrorKind::NotFound,
            Error::DuplicateCategoryName(_)
            | Error::CategoryHasItems { .. }
            | Error::ItemOnList(_)
            | Error::ItemAlreadyOnList(_) => ErrorKind::Conflict,
            Error::RequestBodyTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Error::SqlError(_) | Error::DatabaseLockError => ErrorKind::InternalError,
        }
    }
}

/// The JSON body of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The kind of error.
    pub error: ErrorKind,
    /// A human-readable description of the error.
    pub message: String,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();

        let message = match kind {
            // Internal errors are not intended to be shown to the client.
            ErrorKind::InternalError => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            _ => self.to_string(),
        };

        (
            kind.status_code(),
            Json(ErrorResponse {
                error: kind,
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, ErrorKind};

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(
            Error::EmptyItemName.kind().status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::EntryNotActive(1).kind().status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::ItemAlreadyOnList("Milk".to_owned()).kind().status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::DatabaseLockError.kind().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn conflict_response_has_conflict_status() {
        let response = Error::CategoryHasItems {
            name: "Dairy".to_owned(),
            item_count: 2,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}

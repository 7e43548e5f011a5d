//! Aggregate statistics over the shopping list.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// Counts of the entries on the shopping list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStats {
    /// Active and purchased entries together.
    #[serde(rename = "total_varer")]
    pub total_items: u32,
    #[serde(rename = "aktive_varer")]
    pub active_items: u32,
    #[serde(rename = "koebte_varer")]
    pub purchased_items: u32,
    /// The share of entries that are purchased, rounded to the nearest whole
    /// percent. Zero when the list is empty.
    #[serde(rename = "procent_koebt")]
    pub percent_purchased: u32,
}

impl ListStats {
    /// Derive the statistics from the number of entries and how many of them are purchased.
    ///
    /// Halves are rounded up, so 1 of 8 purchased is 13%.
    pub fn from_counts(total_items: u32, purchased_items: u32) -> Self {
        let percent_purchased = if total_items == 0 {
            0
        } else {
            let total = u64::from(total_items);
            ((u64::from(purchased_items) * 100 + total / 2) / total) as u32
        };

        Self {
            total_items,
            active_items: total_items - purchased_items,
            purchased_items,
            percent_purchased,
        }
    }
}

/// Count the entries on the shopping list.
///
/// Always reads the current state of the list.
pub fn compute_stats(connection: &Connection) -> Result<ListStats, Error> {
    let (total_items, purchased_items): (u32, u32) = connection.query_row(
        "SELECT COUNT(1), COALESCE(SUM(status = 'purchased'), 0) FROM list_entry",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(ListStats::from_counts(total_items, purchased_items))
}

/// The state needed to compute the shopping list statistics.
#[derive(Debug, Clone)]
pub struct StatsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle a request for the shopping list statistics.
pub async fn get_stats_endpoint(State(state): State<StatsState>) -> Result<Json<ListStats>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    compute_stats(&connection).map(Json)
}


#[cfg(test)]
mod stats_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        shopping_list::HistoryRecord,
        test_utils::{
            add_to_list_via_api, create_category_via_api, create_item_via_api, get_test_server,
        },
    };

    #[tokio::test]
    async fn stats_follow_the_list_lifecycle() {
        let server = get_test_server();
        let dairy = create_category_via_api(&server, "Dairy").await;
        let milk = create_item_via_api(&server, "Milk", dairy.id).await;
        let entry = add_to_list_via_api(&server, milk.id).await;

        let stats = server.get(endpoints::LIST_STATS).await.json::<Value>();
        assert_eq!(
            stats,
            json!({ "total_varer": 1, "aktive_varer": 1, "koebte_varer": 0, "procent_koebt": 0 })
        );

        server
            .post(&format_endpoint(endpoints::MARK_PURCHASED, entry.id))
            .await
            .assert_status(StatusCode::OK);
        let stats = server.get(endpoints::LIST_STATS).await.json::<Value>();
        assert_eq!(
            stats,
            json!({ "total_varer": 1, "aktive_varer": 0, "koebte_varer": 1, "procent_koebt": 100 })
        );

        server
            .delete(endpoints::CLEAR_PURCHASED)
            .await
            .assert_status(StatusCode::OK);
        let stats = server.get(endpoints::LIST_STATS).await.json::<Value>();
        assert_eq!(
            stats,
            json!({ "total_varer": 0, "aktive_varer": 0, "koebte_varer": 0, "procent_koebt": 0 })
        );
        let history = server.get(endpoints::HISTORY).await.json::<Vec<HistoryRecord>>();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].item_name, "Milk");
    }
}

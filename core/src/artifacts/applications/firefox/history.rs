use crate::{
    artifacts::applications::error::BrowserError,
    utils::time::{is_sentinel, mozilla_to_datetime},
};
use common::{
    applications::HistoryRecord,
    evidence::{ArtifactType, Evidence, EvidenceData},
};
use log::{debug, error};
use rusqlite::Connection;

struct PlacesRow {
    url: String,
    title: String,
    visit_count: i64,
    last_visit_date: i64,
}

/// Query the Firefox `moz_places` table. Places that were never visited are skipped
pub(crate) fn history_query(
    conn: &Connection,
    source: &str,
) -> Result<Vec<Evidence>, BrowserError> {
    let statement = conn.prepare(
        "SELECT url, title, visit_count, last_visit_date FROM moz_places WHERE last_visit_date > 0",
    );
    let mut stmt = match statement {
        Ok(query) => query,
        Err(err) => {
            error!("[firefox] Failed to compose Firefox History SQL query {err:?}");
            return Err(BrowserError::BadSql);
        }
    };

    let history_data = stmt.query_map([], |row| {
        Ok(PlacesRow {
            url: row.get("url").unwrap_or_default(),
            title: row.get("title").unwrap_or_default(),
            visit_count: row.get("visit_count").unwrap_or_default(),
            last_visit_date: row.get("last_visit_date")?,
        })
    });

    let history_iter = match history_data {
        Ok(result) => result,
        Err(err) => {
            error!("[firefox] Failed to get Firefox history data: {err:?}");
            return Err(BrowserError::Query);
        }
    };

    let mut evidence_vec: Vec<Evidence> = Vec::new();
    for history in history_iter {
        let places_row = match history {
            Ok(result) => result,
            Err(err) => {
                error!("[firefox] Failed to iterate Firefox history data: {err:?}");
                continue;
            }
        };

        let timestamp = mozilla_to_datetime(places_row.last_visit_date);
        if is_sentinel(&timestamp) {
            debug!("[firefox] Skipping {} with no usable visit time", places_row.url);
            continue;
        }

        let record = HistoryRecord {
            url: places_row.url,
            title: places_row.title,
            visit_count: places_row.visit_count,
        };
        match Evidence::new(
            source,
            ArtifactType::FirefoxHistory,
            EvidenceData::History(record),
            timestamp,
        ) {
            Ok(result) => evidence_vec.push(result),
            Err(err) => error!("[firefox] Could not create history Evidence: {err:?}"),
        }
    }

    Ok(evidence_vec)
}

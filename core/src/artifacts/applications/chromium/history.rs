use crate::{
    artifacts::applications::error::BrowserError,
    utils::time::{is_sentinel, webkit_to_datetime},
};
use common::{
    applications::HistoryRecord,
    evidence::{ArtifactType, Evidence, EvidenceData},
};
use log::{debug, error};
use rusqlite::Connection;

struct UrlRow {
    url: String,
    title: String,
    visit_count: i64,
    last_visit_time: i64,
}

/// Query the Chromium `urls` table. Rows that were never visited are skipped
pub(crate) fn history_query(
    conn: &Connection,
    source: &str,
) -> Result<Vec<Evidence>, BrowserError> {
    let statement = conn.prepare(
        "SELECT url, title, visit_count, last_visit_time FROM urls WHERE last_visit_time > 0",
    );
    let mut stmt = match statement {
        Ok(query) => query,
        Err(err) => {
            error!("[chromium] Failed to compose Chromium History SQL query {err:?}");
            return Err(BrowserError::BadSql);
        }
    };

    let history_data = stmt.query_map([], |row| {
        Ok(UrlRow {
            url: row.get("url").unwrap_or_default(),
            title: row.get("title").unwrap_or_default(),
            visit_count: row.get("visit_count").unwrap_or_default(),
            last_visit_time: row.get("last_visit_time")?,
        })
    });

    let history_iter = match history_data {
        Ok(result) => result,
        Err(err) => {
            error!("[chromium] Failed to get Chromium history data: {err:?}");
            return Err(BrowserError::Query);
        }
    };

    let mut evidence_vec: Vec<Evidence> = Vec::new();
    for history in history_iter {
        let url_row = match history {
            Ok(result) => result,
            Err(err) => {
                error!("[chromium] Failed to iterate Chromium history data: {err:?}");
                continue;
            }
        };

        let timestamp = webkit_to_datetime(url_row.last_visit_time);
        if is_sentinel(&timestamp) {
            debug!("[chromium] Skipping {} with no usable visit time", url_row.url);
            continue;
        }

        let record = HistoryRecord {
            url: url_row.url,
            title: url_row.title,
            visit_count: url_row.visit_count,
        };
        match Evidence::new(
            source,
            ArtifactType::ChromiumHistory,
            EvidenceData::History(record),
            timestamp,
        ) {
            Ok(result) => evidence_vec.push(result),
            Err(err) => error!("[chromium] Could not create history Evidence: {err:?}"),
        }
    }

    Ok(evidence_vec)
}

use crate::{artifacts::applications::error::BrowserError, utils::time::mozilla_to_datetime};
use common::{
    applications::CookieRecord,
    evidence::{ArtifactType, Evidence, EvidenceData},
};
use log::error;
use rusqlite::Connection;

/// Query the Firefox `moz_cookies` table. Firefox stores cookie values in plaintext
pub(crate) fn cookies_query(
    conn: &Connection,
    source: &str,
) -> Result<Vec<Evidence>, BrowserError> {
    let statement = conn.prepare("SELECT host, name, path, value, creationTime FROM moz_cookies");
    let mut stmt = match statement {
        Ok(query) => query,
        Err(err) => {
            error!("[firefox] Failed to compose Firefox Cookies SQL query {err:?}");
            return Err(BrowserError::BadSql);
        }
    };

    let cookie_data = stmt.query_map([], |row| {
        let creation: i64 = row.get("creationTime").unwrap_or_default();
        Ok((
            CookieRecord {
                host: row.get("host").unwrap_or_default(),
                name: row.get("name").unwrap_or_default(),
                path: row.get("path").unwrap_or_default(),
                value: row.get("value").unwrap_or_default(),
            },
            creation,
        ))
    });

    let cookie_iter = match cookie_data {
        Ok(result) => result,
        Err(err) => {
            error!("[firefox] Failed to get Firefox cookie data: {err:?}");
            return Err(BrowserError::Query);
        }
    };

    let mut evidence_vec: Vec<Evidence> = Vec::new();
    for cookie in cookie_iter {
        let (record, creation) = match cookie {
            Ok(result) => result,
            Err(err) => {
                error!("[firefox] Failed to iterate Firefox cookie data: {err:?}");
                continue;
            }
        };

        match Evidence::new(
            source,
            ArtifactType::FirefoxCookie,
            EvidenceData::Cookie(record),
            mozilla_to_datetime(creation),
        ) {
            Ok(result) => evidence_vec.push(result),
            Err(err) => error!("[firefox] Could not create cookie Evidence: {err:?}"),
        }
    }

    Ok(evidence_vec)
}

use crate::{artifacts::applications::error::BrowserError, utils::time::webkit_to_datetime};
use common::{
    applications::CookieRecord,
    evidence::{ArtifactType, Evidence, EvidenceData},
};
use log::error;
use rusqlite::Connection;

/// Placeholder used when Chromium only stores the DPAPI/OS keychain protected value
const ENCRYPTED: &str = "[Encrypted]";

struct CookieRow {
    host_key: String,
    name: String,
    path: String,
    value: String,
    encrypted_value: Vec<u8>,
    creation_utc: i64,
}

/// Query the Chromium `cookies` table. Encrypted values are never decrypted
pub(crate) fn cookies_query(
    conn: &Connection,
    source: &str,
) -> Result<Vec<Evidence>, BrowserError> {
    let statement = conn.prepare(
        "SELECT host_key, name, path, value, encrypted_value, creation_utc FROM cookies",
    );
    let mut stmt = match statement {
        Ok(query) => query,
        Err(err) => {
            error!("[chromium] Failed to compose Chromium Cookies SQL query {err:?}");
            return Err(BrowserError::BadSql);
        }
    };

    let cookie_data = stmt.query_map([], |row| {
        Ok(CookieRow {
            host_key: row.get("host_key").unwrap_or_default(),
            name: row.get("name").unwrap_or_default(),
            path: row.get("path").unwrap_or_default(),
            value: row.get("value").unwrap_or_default(),
            encrypted_value: row.get("encrypted_value").unwrap_or_default(),
            creation_utc: row.get("creation_utc").unwrap_or_default(),
        })
    });

    let cookie_iter = match cookie_data {
        Ok(result) => result,
        Err(err) => {
            error!("[chromium] Failed to get Chromium cookie data: {err:?}");
            return Err(BrowserError::Query);
        }
    };

    let mut evidence_vec: Vec<Evidence> = Vec::new();
    for cookie in cookie_iter {
        let cookie_row = match cookie {
            Ok(result) => result,
            Err(err) => {
                error!("[chromium] Failed to iterate Chromium cookie data: {err:?}");
                continue;
            }
        };

        let record = CookieRecord {
            host: cookie_row.host_key,
            name: cookie_row.name,
            path: cookie_row.path,
            value: cookie_value(cookie_row.value, &cookie_row.encrypted_value),
        };
        match Evidence::new(
            source,
            ArtifactType::ChromiumCookie,
            EvidenceData::Cookie(record),
            webkit_to_datetime(cookie_row.creation_utc),
        ) {
            Ok(result) => evidence_vec.push(result),
            Err(err) => error!("[chromium] Could not create cookie Evidence: {err:?}"),
        }
    }

    Ok(evidence_vec)
}

/// Modern Chromium leaves `value` empty and stores the real value in `encrypted_value`
fn cookie_value(value: String, encrypted_value: &[u8]) -> String {
    if value.is_empty() && !encrypted_value.is_empty() {
        return ENCRYPTED.to_string();
    }
    value
}

//! Marketplace credentials from the SQLite `apis_valores` table.

use rusqlite::{Connection, OpenFlags, params_from_iter};
use soldsync_core::Credential;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;

/// Reads candidate credentials from the shared token table.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store over the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the tokens for `ids`, labelled from `owners`, ordered by id.
    ///
    /// Rows whose id has no owner label are skipped. Fails if the database
    /// cannot be read or no labelled row remains.
    #[instrument(skip(self, owners), fields(db = %self.path.display()))]
    pub fn load(&self, ids: &[u32], owners: &BTreeMap<u32, String>) -> Result<Vec<Credential>, StoreError> {
        if ids.is_empty() {
            return Err(StoreError::NoCredentials);
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            "SELECT id_api_valor, access_token FROM apis_valores \
             WHERE id_api_valor IN ({placeholders}) ORDER BY id_api_valor"
        );

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt
            .query_map(params_from_iter(ids.iter()), |row| {
                Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = rows.len(), "Queried credential table");

        let credentials: Vec<Credential> = rows
            .into_iter()
            .filter_map(|(id, token)| match owners.get(&id) {
                Some(owner) => Some(Credential::new(id, owner.clone(), token)),
                None => {
                    warn!(credential = id, "Credential id has no owner label, skipping");
                    None
                }
            })
            .collect();

        if credentials.is_empty() {
            return Err(StoreError::NoCredentials);
        }

        info!(
            count = credentials.len(),
            owners = ?credentials.iter().map(Credential::owner).collect::<Vec<_>>(),
            "Loaded credentials"
        );
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soldsync_core::CredentialId;
    use tempfile::TempDir;

    fn owners() -> BTreeMap<u32, String> {
        BTreeMap::from([
            (1, "Silvio".to_string()),
            (2, "Lucas".to_string()),
            (3, "Leandro".to_string()),
        ])
    }

    fn seed(dir: &TempDir, rows: &[(u32, &str)]) -> PathBuf {
        let path = dir.path().join("apis.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "CREATE TABLE apis_valores (id_api_valor INTEGER PRIMARY KEY, access_token TEXT NOT NULL)",
            [],
        )
        .unwrap();
        for (id, token) in rows {
            conn.execute(
                "INSERT INTO apis_valores (id_api_valor, access_token) VALUES (?1, ?2)",
                rusqlite::params![id, token],
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn test_loads_requested_ids_in_order() {
        let dir = TempDir::new().unwrap();
        let path = seed(&dir, &[(3, "t3"), (1, "t1"), (2, "t2"), (9, "t9")]);

        let creds = CredentialStore::new(path).load(&[1, 2, 3], &owners()).unwrap();

        let ids: Vec<CredentialId> = creds.iter().map(Credential::id).collect();
        assert_eq!(ids, vec![CredentialId(1), CredentialId(2), CredentialId(3)]);
        assert_eq!(creds[0].owner(), "Silvio");
        assert_eq!(creds[2].token(), "t3");
    }

    #[test]
    fn test_unlabelled_ids_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = seed(&dir, &[(1, "t1"), (4, "t4")]);

        let creds = CredentialStore::new(path).load(&[1, 4], &owners()).unwrap();
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].id(), CredentialId(1));
    }

    #[test]
    fn test_no_rows_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = seed(&dir, &[(9, "t9")]);

        let result = CredentialStore::new(path).load(&[1, 2, 3], &owners());
        assert!(matches!(result, Err(StoreError::NoCredentials)));
    }

    #[test]
    fn test_missing_database_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = CredentialStore::new(dir.path().join("absent.db")).load(&[1], &owners());
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path).unwrap();

        let result = CredentialStore::new(path).load(&[1], &owners());
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}

//! SQLite object repository
//!
//! Objects live in the `objects` table keyed by `(kind, namespace, name)`.
//! The payload column holds JSON: the annotations of a target, the data
//! entries of a source. Updates are conditional on `resource_version`, so a
//! write from another connection between our read and our write is reported
//! as a conflict rather than lost.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use annotator_core::{Annotations, ObjectKey, ObjectRepository, SourceObject, TargetObject};
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db;
use crate::errors::{conflict, from_rusqlite, not_found, serialization, Result};
use crate::migrations::apply_migrations;

const KIND_TARGET: &str = "target";
const KIND_SOURCE: &str = "source";

/// Repository over a single SQLite connection
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRepository").finish_non_exhaustive()
    }
}

impl SqliteRepository {
    /// Open (creating if needed) and migrate the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure(&conn)?;
        Self::from_connection(conn)
    }

    /// Fresh migrated in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Wrap an existing connection, applying pending migrations
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create or replace a target, ignoring its `resource_version`
    pub fn put_target(&self, target: &TargetObject) -> Result<TargetObject> {
        let conn = self.lock();
        let version = upsert_target(&conn, target)?;
        Ok(TargetObject {
            resource_version: version,
            ..target.clone()
        })
    }

    /// Create or replace the source object, ignoring its `resource_version`
    pub fn put_source(&self, source: &SourceObject) -> Result<SourceObject> {
        let conn = self.lock();
        let version = upsert_source(&conn, source)?;
        Ok(SourceObject {
            resource_version: version,
            ..source.clone()
        })
    }

    /// Run `f` inside one transaction on the underlying connection
    pub(crate) fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock();
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let value = f(&tx)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(value)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Insert or overwrite an object row; returns the new resource version
fn upsert<T: Serialize>(
    conn: &Connection,
    kind: &str,
    key: &ObjectKey,
    payload: &T,
) -> Result<u64> {
    let payload = serde_json::to_string(payload).map_err(|e| serialization(key, e))?;
    let now = chrono::Utc::now().timestamp();

    let version: i64 = conn
        .query_row(
            "INSERT INTO objects (kind, namespace, name, payload, resource_version, updated_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5)
             ON CONFLICT(kind, namespace, name) DO UPDATE SET
                payload = excluded.payload,
                resource_version = objects.resource_version + 1,
                updated_at = excluded.updated_at
             RETURNING resource_version",
            rusqlite::params![kind, key.namespace, key.name, payload, now],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;

    Ok(version as u64)
}

pub(crate) fn upsert_target(conn: &Connection, target: &TargetObject) -> Result<u64> {
    upsert(conn, KIND_TARGET, &target.key, &target.annotations)
}

pub(crate) fn upsert_source(conn: &Connection, source: &SourceObject) -> Result<u64> {
    upsert(conn, KIND_SOURCE, &source.key, &source.data)
}

fn load<T: DeserializeOwned>(
    conn: &Connection,
    kind: &str,
    key: &ObjectKey,
) -> Result<Option<(T, u64)>> {
    let row: Option<(String, i64)> = conn
        .query_row(
            "SELECT payload, resource_version FROM objects
             WHERE kind = ?1 AND namespace = ?2 AND name = ?3",
            rusqlite::params![kind, key.namespace, key.name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(from_rusqlite)?;

    row.map(|(payload, version)| {
        serde_json::from_str(&payload)
            .map(|value| (value, version as u64))
            .map_err(|e| serialization(key, e))
    })
    .transpose()
}

fn current_version(conn: &Connection, kind: &str, key: &ObjectKey) -> Result<Option<u64>> {
    conn.query_row(
        "SELECT resource_version FROM objects
         WHERE kind = ?1 AND namespace = ?2 AND name = ?3",
        rusqlite::params![kind, key.namespace, key.name],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map(|version| version.map(|v| v as u64))
    .map_err(from_rusqlite)
}

impl ObjectRepository for SqliteRepository {
    fn get_target(&self, key: &ObjectKey) -> Result<TargetObject> {
        let conn = self.lock();
        let (annotations, resource_version) = load::<Annotations>(&conn, KIND_TARGET, key)?
            .ok_or_else(|| not_found("get_target", key))?;
        Ok(TargetObject {
            key: key.clone(),
            annotations,
            resource_version,
        })
    }

    fn list_targets(&self, namespace: Option<&str>) -> Result<Vec<TargetObject>> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(
                "SELECT namespace, name, payload, resource_version FROM objects
                 WHERE kind = ?1 AND (?2 IS NULL OR namespace = ?2)
                 ORDER BY namespace, name",
            )
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map(rusqlite::params![KIND_TARGET, namespace], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter()
            .map(|(namespace, name, payload, version)| -> Result<TargetObject> {
                let key = ObjectKey::new(namespace, name);
                let annotations =
                    serde_json::from_str(&payload).map_err(|e| serialization(&key, e))?;
                Ok(TargetObject {
                    key,
                    annotations,
                    resource_version: version as u64,
                })
            })
            .collect()
    }

    fn update_target(&self, object: &TargetObject) -> Result<TargetObject> {
        let payload =
            serde_json::to_string(&object.annotations).map_err(|e| serialization(&object.key, e))?;
        let conn = self.lock();

        let changed = conn
            .execute(
                "UPDATE objects
                 SET payload = ?1, resource_version = resource_version + 1, updated_at = ?2
                 WHERE kind = ?3 AND namespace = ?4 AND name = ?5 AND resource_version = ?6",
                rusqlite::params![
                    payload,
                    chrono::Utc::now().timestamp(),
                    KIND_TARGET,
                    object.key.namespace,
                    object.key.name,
                    object.resource_version as i64,
                ],
            )
            .map_err(from_rusqlite)?;

        if changed == 0 {
            return Err(match current_version(&conn, KIND_TARGET, &object.key)? {
                Some(actual) => conflict(
                    "update_target",
                    &object.key,
                    object.resource_version,
                    actual,
                ),
                None => not_found("update_target", &object.key),
            });
        }

        Ok(TargetObject {
            resource_version: object.resource_version + 1,
            ..object.clone()
        })
    }

    fn get_source(&self, key: &ObjectKey) -> Result<SourceObject> {
        let conn = self.lock();
        let (data, resource_version) = load(&conn, KIND_SOURCE, key)?
            .ok_or_else(|| not_found("get_source", key))?;
        Ok(SourceObject {
            key: key.clone(),
            data,
            resource_version,
        })
    }
}

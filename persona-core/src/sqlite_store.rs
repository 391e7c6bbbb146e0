//! SQLite-backed vector store.
//!
//! Each memory is one row: the entry serialized to JSON in a BLOB column
//! (schema-stable across memory-type changes), the embedding as raw
//! little-endian `f32` bytes. Every mutating call runs in its own
//! transaction — the data model never needs cross-entity atomicity.
//!
//! Loading is corruption-tolerant: a malformed row is logged and skipped,
//! never allowed to fail the rest of a query.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info, warn};

use crate::config::PersistenceConfig;
use crate::embedding::{cosine_similarity, Embedding};
use crate::error::{PersonaError, Result};
use crate::memory::{MemoryEntry, MemoryId};
use crate::store::{rank_hits, ScoredMemory, VectorStore};

/// Persistent vector store over SQLite.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    dimensions: usize,
    db_path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteVectorStore")
            .field("db_path", &self.db_path)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl SqliteVectorStore {
    /// Open (or create) a database at `path` for embeddings of the given
    /// dimensionality. The schema is created if missing; WAL mode follows
    /// the persistence config.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(
        path: P,
        dimensions: usize,
        config: &PersistenceConfig,
    ) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {};",
            config.busy_timeout_ms
        ))?;

        Self::create_schema(&conn)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            dimensions,
            "memory store opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            dimensions,
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory database (used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Database`] on SQLite failures.
    pub fn open_in_memory(dimensions: usize) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::create_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            dimensions,
            db_path: None,
        })
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS memories (
                id         TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                data       BLOB NOT NULL,
                embedding  BLOB NOT NULL
            );",
        )?;
        Ok(())
    }

    fn embedding_to_bytes(embedding: &Embedding) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(embedding.0.len() * 4);
        for value in &embedding.0 {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    fn embedding_from_bytes(bytes: &[u8]) -> Option<Embedding> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        let values = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Some(Embedding(values))
    }

    /// Decode one row, returning `None` (with a warning) for corrupt
    /// data. A single bad record must not block the rest of the store.
    fn decode_row(id: &str, data: &[u8], embedding: &[u8]) -> Option<(MemoryEntry, Embedding)> {
        let entry: MemoryEntry = match serde_json::from_slice(data) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(memory_id = id, %err, "skipping corrupt memory record");
                return None;
            }
        };
        let Some(embedding) = Self::embedding_from_bytes(embedding) else {
            warn!(memory_id = id, "skipping memory record with corrupt embedding");
            return None;
        };
        Some((entry, embedding))
    }

    fn check_dimensions(&self, embedding: &Embedding) -> Result<()> {
        if embedding.dimensions() == self.dimensions {
            Ok(())
        } else {
            Err(PersonaError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.dimensions(),
            })
        }
    }

    /// Load every decodable `(entry, embedding)` pair.
    fn load_all(&self) -> Result<Vec<(MemoryEntry, Embedding)>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, data, embedding FROM memories")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, data, embedding) = row?;
            if let Some(decoded) = Self::decode_row(&id, &data, &embedding) {
                out.push(decoded);
            }
        }
        Ok(out)
    }
}

impl VectorStore for SqliteVectorStore {
    fn store(&mut self, mut entry: MemoryEntry, embedding: Embedding) -> Result<()> {
        self.check_dimensions(&embedding)?;
        entry.set_embedding(embedding.clone());

        let data = serde_json::to_vec(&entry)
            .map_err(|e| PersonaError::Serialization(e.to_string()))?;
        let bytes = Self::embedding_to_bytes(&embedding);

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO memories (id, created_at, data, embedding)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.id().to_string(),
                entry.created_at().to_rfc3339(),
                data,
                bytes
            ],
        )?;
        tx.commit()?;

        debug!(memory_id = %entry.id(), "memory stored");
        Ok(())
    }

    fn search(
        &self,
        query_embedding: &Embedding,
        limit: usize,
        owner_id: Option<&str>,
    ) -> Result<Vec<ScoredMemory>> {
        self.check_dimensions(query_embedding)?;
        let mut hits: Vec<ScoredMemory> = self
            .load_all()?
            .into_iter()
            .filter(|(entry, _)| owner_id.is_none_or(|o| entry.involves(o)))
            .map(|(entry, embedding)| {
                let similarity = cosine_similarity(query_embedding, &embedding);
                (entry, similarity)
            })
            .collect();
        rank_hits(&mut hits);
        hits.truncate(limit);
        Ok(hits)
    }

    fn get(&self, memory_id: MemoryId) -> Option<MemoryEntry> {
        let conn = self.conn.lock();
        let result = conn.query_row(
            "SELECT id, data, embedding FROM memories WHERE id = ?1",
            params![memory_id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Vec<u8>>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                ))
            },
        );
        match result {
            Ok((id, data, embedding)) => {
                Self::decode_row(&id, &data, &embedding).map(|(entry, _)| entry)
            }
            Err(_) => None,
        }
    }

    fn delete(&mut self, memory_id: MemoryId) -> bool {
        let mut conn = self.conn.lock();
        let Ok(tx) = conn.transaction() else {
            return false;
        };
        let deleted = tx
            .execute(
                "DELETE FROM memories WHERE id = ?1",
                params![memory_id.to_string()],
            )
            .unwrap_or(0);
        if tx.commit().is_err() {
            return false;
        }
        deleted > 0
    }

    fn update_embedding(&mut self, memory_id: MemoryId, embedding: Embedding) -> Result<bool> {
        self.check_dimensions(&embedding)?;
        let Some(mut entry) = self.get(memory_id) else {
            return Ok(false);
        };
        entry.set_embedding(embedding.clone());
        let data = serde_json::to_vec(&entry)
            .map_err(|e| PersonaError::Serialization(e.to_string()))?;
        let bytes = Self::embedding_to_bytes(&embedding);

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE memories SET data = ?2, embedding = ?3 WHERE id = ?1",
            params![memory_id.to_string(), data, bytes],
        )?;
        tx.commit()?;
        Ok(updated > 0)
    }

    fn count(&self, owner_id: Option<&str>) -> usize {
        match owner_id {
            None => {
                let conn = self.conn.lock();
                conn.query_row("SELECT COUNT(*) FROM memories", [], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n.max(0) as usize)
                .unwrap_or(0)
            }
            // Participant membership lives inside the JSON blob, so
            // owner-scoped counts decode rows.
            Some(owner) => self
                .load_all()
                .map(|rows| {
                    rows.iter()
                        .filter(|(entry, _)| entry.involves(owner))
                        .count()
                })
                .unwrap_or(0),
        }
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{IndividualMemory, PrivateMemory, SharedMemory};

    fn entry(owner: &str, description: &str) -> MemoryEntry {
        MemoryEntry::Individual(IndividualMemory::new(owner, description))
    }

    fn emb(values: &[f32]) -> Embedding {
        Embedding(values.to_vec())
    }

    #[test]
    fn store_and_get_round_trip() {
        let mut store = SqliteVectorStore::open_in_memory(3).unwrap();
        let memory = entry("sarah", "coffee with Mike");
        let id = memory.id();
        store.store(memory, emb(&[1.0, 0.0, 0.0])).unwrap();

        let loaded = store.get(id).unwrap();
        assert_eq!(loaded.description(), "coffee with Mike");
        assert_eq!(loaded.embedding().unwrap().dimensions(), 3);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut store = SqliteVectorStore::open_in_memory(3).unwrap();
        assert!(store.store(entry("a", "x"), emb(&[1.0])).is_err());
        assert!(store.search(&emb(&[1.0]), 5, None).is_err());
    }

    #[test]
    fn search_ranks_and_truncates() {
        let mut store = SqliteVectorStore::open_in_memory(2).unwrap();
        store.store(entry("a", "north"), emb(&[0.0, 1.0])).unwrap();
        store.store(entry("a", "east"), emb(&[1.0, 0.0])).unwrap();
        store.store(entry("a", "northeast"), emb(&[0.7, 0.7])).unwrap();

        let hits = store.search(&emb(&[1.0, 0.0]), 2, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0.description(), "east");
        assert_eq!(hits[1].0.description(), "northeast");
    }

    #[test]
    fn owner_filter_covers_shared_participants() {
        let mut store = SqliteVectorStore::open_in_memory(2).unwrap();
        store.store(entry("sarah", "hers"), emb(&[1.0, 0.0])).unwrap();
        store
            .store(
                MemoryEntry::Shared(SharedMemory::new(
                    "dinner",
                    vec!["sarah".to_string(), "mike".to_string()],
                )),
                emb(&[1.0, 0.0]),
            )
            .unwrap();

        let hits = store.search(&emb(&[1.0, 0.0]), 10, Some("mike")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.description(), "dinner");
        assert_eq!(store.count(Some("sarah")), 2);
    }

    #[test]
    fn delete_removes_row() {
        let mut store = SqliteVectorStore::open_in_memory(2).unwrap();
        let memory = entry("a", "temp");
        let id = memory.id();
        store.store(memory, emb(&[1.0, 0.0])).unwrap();
        assert_eq!(store.count(None), 1);
        assert!(store.delete(id));
        assert_eq!(store.count(None), 0);
        assert!(!store.delete(id));
    }

    #[test]
    fn update_embedding_persists() {
        let mut store = SqliteVectorStore::open_in_memory(2).unwrap();
        let memory = entry("a", "moves");
        let id = memory.id();
        store.store(memory, emb(&[1.0, 0.0])).unwrap();
        assert!(store.update_embedding(id, emb(&[0.0, 1.0])).unwrap());

        let hits = store.search(&emb(&[0.0, 1.0]), 1, None).unwrap();
        assert!((hits[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn corrupt_row_is_skipped_not_fatal() {
        let mut store = SqliteVectorStore::open_in_memory(2).unwrap();
        store.store(entry("a", "good"), emb(&[1.0, 0.0])).unwrap();
        store
            .store(
                MemoryEntry::Private(PrivateMemory::new("a", "also good", 0.5).unwrap()),
                emb(&[0.9, 0.1]),
            )
            .unwrap();

        // Corrupt one record's JSON behind the store's back.
        {
            let conn = store.conn.lock();
            conn.execute(
                "UPDATE memories SET data = ?1 WHERE rowid = (SELECT MIN(rowid) FROM memories)",
                params![b"{not json".to_vec()],
            )
            .unwrap();
        }

        // The intact record still loads; the corrupt one is silently
        // dropped from results.
        let hits = store.search(&emb(&[1.0, 0.0]), 10, None).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn on_disk_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memories.db");
        let config = PersistenceConfig::default();

        let id = {
            let mut store = SqliteVectorStore::open(&path, 2, &config).unwrap();
            let memory = entry("sarah", "persisted");
            let id = memory.id();
            store.store(memory, emb(&[1.0, 0.0])).unwrap();
            id
        };

        let store = SqliteVectorStore::open(&path, 2, &config).unwrap();
        assert_eq!(store.get(id).unwrap().description(), "persisted");
    }
}

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use substrate_core::document::{Document, Filter, Payload, ScoredDocument};
use substrate_core::errors::SubstrateError;
use substrate_core::{RequestContext, SubstrateResult};

use crate::store::{cosine_similarity, matches_filter, VectorStore};

fn to_backend_err(component: &str, e: impl std::fmt::Display) -> SubstrateError {
    SubstrateError::backend(component, e.to_string())
}

/// rusqlite-backed store: a brute-force cosine scan over blob-encoded
/// embeddings, with no reliance on a vector-search sqlite extension being
/// loaded. One connection behind a mutex is enough here — this crate has
/// no read/write pool split to preserve.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    pub fn open(path: &Path) -> SubstrateResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> SubstrateResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> SubstrateResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                dimension INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                payload TEXT NOT NULL,
                embedding BLOB NOT NULL,
                PRIMARY KEY (collection, id)
            );",
        )
        .map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn dimension_of(conn: &Connection, collection: &str) -> SubstrateResult<u32> {
        conn.query_row(
            "SELECT dimension FROM collections WHERE name = ?1",
            params![collection],
            |row| row.get::<_, i64>(0),
        )
        .map(|d| d as u32)
        .map_err(|_| SubstrateError::NotFound(format!("collection {collection}")))
    }
}

fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

impl VectorStore for SqliteVectorStore {
    fn ensure_collection(&self, ctx: &RequestContext, collection: &str, dim: u32) -> SubstrateResult<()> {
        ctx.check_cancelled()?;
        let conn = self.conn.lock().expect("vectorstore mutex poisoned");
        if let Ok(existing) = Self::dimension_of(&conn, collection) {
            if existing != dim {
                return Err(SubstrateError::InvalidArgs(format!(
                    "collection {collection} already exists with dimension {existing}, requested {dim}"
                )));
            }
            return Ok(());
        }
        conn.execute(
            "INSERT INTO collections (name, dimension) VALUES (?1, ?2)
             ON CONFLICT(name) DO NOTHING",
            params![collection, dim as i64],
        )
        .map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
        Ok(())
    }

    fn add_documents(&self, ctx: &RequestContext, collection: &str, docs: &[Document]) -> SubstrateResult<()> {
        ctx.check_cancelled()?;
        let conn = self.conn.lock().expect("vectorstore mutex poisoned");
        let dim = Self::dimension_of(&conn, collection)?;
        for doc in docs {
            if doc.embedding.len() != dim as usize {
                return Err(SubstrateError::InvalidArgs(format!(
                    "document {} has embedding dimension {}, collection {collection} expects {dim}",
                    doc.id,
                    doc.embedding.len()
                )));
            }
        }
        for doc in docs {
            let payload_json =
                serde_json::to_string(&doc.payload).map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
            let blob = f32_vec_to_bytes(&doc.embedding);
            conn.execute(
                "INSERT INTO documents (collection, id, payload, embedding) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(collection, id) DO UPDATE SET payload = excluded.payload, embedding = excluded.embedding",
                params![collection, doc.id, payload_json, blob],
            )
            .map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
        }
        Ok(())
    }

    fn query(
        &self,
        ctx: &RequestContext,
        collection: &str,
        query: &[f32],
        limit: usize,
        filter: &Filter,
    ) -> SubstrateResult<Vec<ScoredDocument>> {
        ctx.check_cancelled()?;
        let conn = self.conn.lock().expect("vectorstore mutex poisoned");
        let dim = Self::dimension_of(&conn, collection)?;
        if query.len() != dim as usize {
            return Err(SubstrateError::InvalidArgs(format!(
                "query embedding dimension {} does not match collection {collection} dimension {dim}",
                query.len()
            )));
        }

        let mut stmt = conn
            .prepare("SELECT id, payload, embedding FROM documents WHERE collection = ?1")
            .map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
        let rows = stmt
            .query_map(params![collection], |row| {
                let id: String = row.get(0)?;
                let payload_json: String = row.get(1)?;
                let embedding: Vec<u8> = row.get(2)?;
                Ok((id, payload_json, embedding))
            })
            .map_err(|e| to_backend_err("vectorstore.sqlite", e))?;

        let mut scored = Vec::new();
        for row in rows {
            ctx.check_cancelled()?;
            let (id, payload_json, blob) = row.map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
            let payload: Payload =
                serde_json::from_str(&payload_json).map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
            if !matches_filter(&payload, filter) {
                continue;
            }
            let embedding = bytes_to_f32_vec(&blob);
            let score = cosine_similarity(query, &embedding);
            scored.push(ScoredDocument {
                document: Document { id, collection: collection.to_string(), payload, embedding },
                score,
            });
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    fn delete(&self, ctx: &RequestContext, collection: &str, ids: &[String]) -> SubstrateResult<()> {
        ctx.check_cancelled()?;
        let conn = self.conn.lock().expect("vectorstore mutex poisoned");
        for id in ids {
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .map_err(|e| to_backend_err("vectorstore.sqlite", e))?;
        }
        Ok(())
    }
}

//! SQLite resolution store
//!
//! File-based persistent storage for lineage records and per-commit
//! metadata. Suitable for local mining runs and downstream analysis
//! with plain SQL.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use satd_core::{
    CommentKind, CommentSnapshot, CommitMeta, LineRange, LocatedResolution, PairOutcome,
    Resolution, SatdInstance,
};

use crate::error::{Result, StorageError};
use crate::sink::ResolutionSink;

/// SQLite-backed ResolutionSink implementation
#[derive(Clone)]
pub struct SqliteResolutionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteResolutionStore {
    /// Create or open a store at the given path
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        // Commits table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS commits (
                hash TEXT PRIMARY KEY,
                author_name TEXT NOT NULL,
                author_email TEXT NOT NULL,
                authored_at INTEGER NOT NULL,
                committed_at INTEGER NOT NULL,
                summary TEXT NOT NULL
            )",
            [],
        )?;

        // Lineage records table. One logical comment appears in several
        // rows over its life, all sharing lineage_id; the UNIQUE key
        // makes re-running the same mining idempotent.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS satd_instances (
                row_id INTEGER PRIMARY KEY AUTOINCREMENT,
                lineage_id INTEGER NOT NULL,
                parent_id INTEGER,
                duplication_id INTEGER NOT NULL,
                old_commit TEXT,
                new_commit TEXT NOT NULL,
                old_file TEXT NOT NULL,
                old_start_line INTEGER NOT NULL,
                old_end_line INTEGER NOT NULL,
                old_text TEXT NOT NULL,
                old_kind TEXT NOT NULL,
                old_class TEXT NOT NULL,
                old_method TEXT NOT NULL,
                new_file TEXT NOT NULL,
                new_start_line INTEGER NOT NULL,
                new_end_line INTEGER NOT NULL,
                new_text TEXT NOT NULL,
                new_kind TEXT NOT NULL,
                new_class TEXT NOT NULL,
                new_method TEXT NOT NULL,
                resolution TEXT NOT NULL,
                FOREIGN KEY (new_commit) REFERENCES commits(hash),
                UNIQUE (new_commit, old_file, old_start_line, new_file, resolution, duplication_id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_instances_commit
             ON satd_instances(new_commit)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_instances_lineage
             ON satd_instances(lineage_id)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_instances_resolution
             ON satd_instances(resolution)",
            [],
        )?;

        Ok(())
    }

    /// All records resolved at one commit, insertion order
    pub fn instances_for_commit(&self, hash: &str) -> Result<Vec<SatdInstance>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT lineage_id, parent_id, duplication_id,
                    old_file, old_start_line, old_end_line, old_text, old_kind, old_class, old_method,
                    new_file, new_start_line, new_end_line, new_text, new_kind, new_class, new_method,
                    resolution
             FROM satd_instances WHERE new_commit = ?1 ORDER BY row_id",
        )?;
        let rows = stmt
            .query_map(params![hash], InstanceRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(InstanceRow::into_instance).collect()
    }

    /// Commit metadata by hash
    pub fn commit(&self, hash: &str) -> Result<Option<CommitMeta>> {
        let conn = self.conn.lock().unwrap();
        let result = conn
            .query_row(
                "SELECT hash, author_name, author_email, authored_at, committed_at, summary
                 FROM commits WHERE hash = ?1",
                params![hash],
                |row| {
                    Ok(CommitMeta {
                        hash: row.get(0)?,
                        author_name: row.get(1)?,
                        author_email: row.get(2)?,
                        authored_at: chrono::DateTime::from_timestamp(row.get(3)?, 0)
                            .unwrap_or_default(),
                        committed_at: chrono::DateTime::from_timestamp(row.get(4)?, 0)
                            .unwrap_or_default(),
                        summary: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// Record counts per resolution value, descending
    pub fn resolution_counts(&self) -> Result<Vec<(String, u64)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT resolution, COUNT(*) FROM satd_instances
             GROUP BY resolution ORDER BY COUNT(*) DESC",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    fn save_commit(tx: &rusqlite::Transaction<'_>, meta: &CommitMeta) -> Result<()> {
        tx.execute(
            "INSERT OR REPLACE INTO commits
             (hash, author_name, author_email, authored_at, committed_at, summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &meta.hash,
                &meta.author_name,
                &meta.author_email,
                meta.authored_at.timestamp(),
                meta.committed_at.timestamp(),
                &meta.summary,
            ],
        )?;
        Ok(())
    }

    fn save_instance(
        tx: &rusqlite::Transaction<'_>,
        old_commit: Option<&str>,
        new_commit: &str,
        instance: &SatdInstance,
    ) -> Result<()> {
        tx.execute(
            "INSERT OR REPLACE INTO satd_instances
             (lineage_id, parent_id, duplication_id, old_commit, new_commit,
              old_file, old_start_line, old_end_line, old_text, old_kind, old_class, old_method,
              new_file, new_start_line, new_end_line, new_text, new_kind, new_class, new_method,
              resolution)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
            params![
                instance.id,
                instance.parent_id,
                instance.duplication_id,
                old_commit,
                new_commit,
                &instance.old_file,
                instance.old_comment.range.start_line,
                instance.old_comment.range.end_line,
                &instance.old_comment.text,
                kind_to_str(instance.old_comment.kind),
                &instance.old_comment.containing_class,
                &instance.old_comment.containing_method,
                &instance.new_file,
                instance.new_comment.range.start_line,
                instance.new_comment.range.end_line,
                &instance.new_comment.text,
                kind_to_str(instance.new_comment.kind),
                &instance.new_comment.containing_class,
                &instance.new_comment.containing_method,
                instance.resolution.as_str(),
            ],
        )?;
        Ok(())
    }
}

impl ResolutionSink for SqliteResolutionStore {
    fn write_pair(&mut self, outcome: &PairOutcome) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;

        Self::save_commit(&tx, &outcome.meta)?;
        for instance in &outcome.instances {
            Self::save_instance(&tx, Some(&outcome.old_hash), &outcome.meta.hash, instance)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn write_located(&mut self, batch: &[LocatedResolution]) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;

        for located in batch {
            Self::save_commit(&tx, &located.commit)?;
            Self::save_instance(&tx, None, &located.commit.hash, &located.instance)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

fn kind_to_str(kind: CommentKind) -> &'static str {
    match kind {
        CommentKind::Line => "LINE",
        CommentKind::Block => "BLOCK",
        CommentKind::Orphan => "ORPHAN",
        CommentKind::JavaDoc => "JAVADOC",
        CommentKind::CommentedOutSource => "COMMENTED_OUT_SOURCE",
        CommentKind::Unknown => "UNKNOWN",
    }
}

fn kind_from_str(s: &str) -> Result<CommentKind> {
    match s {
        "LINE" => Ok(CommentKind::Line),
        "BLOCK" => Ok(CommentKind::Block),
        "ORPHAN" => Ok(CommentKind::Orphan),
        "JAVADOC" => Ok(CommentKind::JavaDoc),
        "COMMENTED_OUT_SOURCE" => Ok(CommentKind::CommentedOutSource),
        "UNKNOWN" => Ok(CommentKind::Unknown),
        other => Err(StorageError::corrupt(format!(
            "unknown comment kind '{other}'"
        ))),
    }
}

fn resolution_from_str(s: &str) -> Result<Resolution> {
    match s {
        "FILE_REMOVED" => Ok(Resolution::FileRemoved),
        "FILE_PATH_CHANGED" => Ok(Resolution::FilePathChanged),
        "SATD_REMOVED" => Ok(Resolution::SatdRemoved),
        "SATD_CHANGED" => Ok(Resolution::SatdChanged),
        "SATD_ADDED" => Ok(Resolution::SatdAdded),
        "CLASS_OR_METHOD_CHANGED" => Ok(Resolution::ClassOrMethodChanged),
        "SATD_MOVED_FILE" => Ok(Resolution::SatdMovedFile),
        "SATD_POSSIBLY_REMOVED" => Ok(Resolution::SatdPossiblyRemoved),
        "SATD_UNADDRESSED" => Ok(Resolution::SatdUnaddressed),
        "ERROR_UNKNOWN" => Ok(Resolution::ErrorUnknown),
        other => Err(StorageError::corrupt(format!(
            "unknown resolution '{other}'"
        ))),
    }
}

/// Raw satd_instances row, before enum columns are parsed back
struct InstanceRow {
    lineage_id: u64,
    parent_id: Option<u64>,
    duplication_id: u32,
    old_file: String,
    old_range: LineRange,
    old_text: String,
    old_kind: String,
    old_class: String,
    old_method: String,
    new_file: String,
    new_range: LineRange,
    new_text: String,
    new_kind: String,
    new_class: String,
    new_method: String,
    resolution: String,
}

impl InstanceRow {
    // Column order must match the SELECT in instances_for_commit
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            lineage_id: row.get(0)?,
            parent_id: row.get(1)?,
            duplication_id: row.get(2)?,
            old_file: row.get(3)?,
            old_range: LineRange::new(row.get(4)?, row.get(5)?),
            old_text: row.get(6)?,
            old_kind: row.get(7)?,
            old_class: row.get(8)?,
            old_method: row.get(9)?,
            new_file: row.get(10)?,
            new_range: LineRange::new(row.get(11)?, row.get(12)?),
            new_text: row.get(13)?,
            new_kind: row.get(14)?,
            new_class: row.get(15)?,
            new_method: row.get(16)?,
            resolution: row.get(17)?,
        })
    }

    fn into_instance(self) -> Result<SatdInstance> {
        let old_comment = CommentSnapshot {
            range: self.old_range,
            text: self.old_text,
            kind: kind_from_str(&self.old_kind)?,
            containing_class: self.old_class,
            containing_method: self.old_method,
        };
        let new_comment = CommentSnapshot {
            range: self.new_range,
            text: self.new_text,
            kind: kind_from_str(&self.new_kind)?,
            containing_class: self.new_class,
            containing_method: self.new_method,
        };
        if old_comment.is_absent() && new_comment.is_absent() {
            return Err(StorageError::corrupt(
                "record has no comment on either side",
            ));
        }
        Ok(SatdInstance {
            id: self.lineage_id,
            parent_id: self.parent_id,
            duplication_id: self.duplication_id,
            old_file: self.old_file,
            old_comment,
            new_file: self.new_file,
            new_comment,
            resolution: resolution_from_str(&self.resolution)?,
        })
    }
}

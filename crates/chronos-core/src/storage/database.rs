//! SQLite-backed persistence.
//!
//! Three tables: `sessions` (the append-only focus history), `tasks`
//! (daily bookkeeping feeding the "today" statistics), and `kv` (opaque
//! blobs such as the parked timer engine). The aggregation functions
//! never query SQL directly; they run over `Vec<FocusSession>` snapshots
//! loaded here.

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::session::{FocusSession, SessionKind, SessionStore};
use crate::tasks::Task;

/// SQLite database for sessions, tasks, and app-state blobs.
pub struct Database {
    conn: Connection,
}

fn format_kind(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Pomodoro => "pomodoro",
        SessionKind::ShortBreak => "short-break",
        SessionKind::LongBreak => "long-break",
    }
}

fn parse_kind(kind: &str) -> SessionKind {
    match kind {
        "short-break" => SessionKind::ShortBreak,
        "long-break" => SessionKind::LongBreak,
        _ => SessionKind::Pomodoro,
    }
}

fn parse_date(date: &str, table: &'static str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| DatabaseError::CorruptRow {
        table,
        message: format!("bad date '{date}': {e}"),
    })
}

impl Database {
    /// Open the database at `~/.config/chronos/chronos.db`, creating the
    /// file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("chronos.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database. For tests and tooling.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           TEXT PRIMARY KEY,
                start_time   INTEGER NOT NULL,
                duration_min INTEGER NOT NULL,
                energy       INTEGER NOT NULL,
                kind         TEXT NOT NULL,
                date         TEXT NOT NULL,
                time_label   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id        TEXT PRIMARY KEY,
                title     TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                date      TEXT NOT NULL,
                slot      INTEGER
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
            CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date);",
        )?;
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Append one completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(&self, session: &FocusSession) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (id, start_time, duration_min, energy, kind, date, time_label)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.start_time,
                session.duration_minutes,
                session.energy_score,
                format_kind(session.kind),
                session.date.to_string(),
                session.time_label,
            ],
        )?;
        Ok(())
    }

    fn load_sessions(
        &self,
        where_clause: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<FocusSession>, DatabaseError> {
        let sql = format!(
            "SELECT id, start_time, duration_min, energy, kind, date, time_label
             FROM sessions {where_clause} ORDER BY start_time"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, start_time, duration_minutes, energy_score, kind, date, time_label) = row?;
            sessions.push(FocusSession {
                id,
                start_time,
                duration_minutes,
                energy_score,
                kind: parse_kind(&kind),
                date: parse_date(&date, "sessions")?,
                time_label,
            });
        }
        Ok(sessions)
    }

    /// The full history, ordered by start time.
    pub fn sessions_all(&self) -> Result<Vec<FocusSession>, DatabaseError> {
        self.load_sessions("", &[])
    }

    pub fn sessions_for_date(&self, date: NaiveDate) -> Result<Vec<FocusSession>, DatabaseError> {
        self.load_sessions("WHERE date = ?1", &[&date.to_string()])
    }

    pub fn sessions_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FocusSession>, DatabaseError> {
        self.load_sessions(
            "WHERE date >= ?1 AND date <= ?2",
            &[&start.to_string(), &end.to_string()],
        )
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Insert a task.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn insert_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, completed, date, slot) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.id,
                task.title,
                task.completed,
                task.date.to_string(),
                task.slot,
            ],
        )?;
        Ok(())
    }

    fn load_tasks(
        &self,
        where_clause: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT id, title, completed, date, slot FROM tasks {where_clause}
             ORDER BY slot IS NULL, slot, rowid"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<u8>>(4)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, title, completed, date, slot) = row?;
            tasks.push(Task {
                id,
                title,
                completed,
                date: parse_date(&date, "tasks")?,
                slot,
            });
        }
        Ok(tasks)
    }

    pub fn tasks_all(&self) -> Result<Vec<Task>, DatabaseError> {
        self.load_tasks("", &[])
    }

    /// Tasks attributed to one day, core slots first.
    pub fn tasks_for_date(&self, date: NaiveDate) -> Result<Vec<Task>, DatabaseError> {
        self.load_tasks("WHERE date = ?1", &[&date.to_string()])
    }

    /// Mark a task complete or incomplete. Returns false for an unknown id.
    pub fn set_task_completed(&self, id: &str, completed: bool) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = ?2 WHERE id = ?1",
            params![id, completed],
        )?;
        Ok(changed > 0)
    }

    /// Delete a task. Returns false for an unknown id.
    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Key-value blobs ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn append(&mut self, session: FocusSession) -> Result<(), CoreError> {
        self.record_session(&session)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn record_and_load_sessions() {
        let db = Database::open_memory().unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 6, 9, 30, 0).unwrap();
        let session = FocusSession::completed_at(25, 4, now);
        db.record_session(&session).unwrap();

        let all = db.sessions_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], session);

        assert_eq!(db.sessions_for_date(date(6)).unwrap().len(), 1);
        assert!(db.sessions_for_date(date(7)).unwrap().is_empty());
        assert_eq!(db.sessions_in_range(date(1), date(31)).unwrap().len(), 1);
    }

    #[test]
    fn sessions_come_back_ordered_by_start_time() {
        let db = Database::open_memory().unwrap();
        let later = Local.with_ymd_and_hms(2024, 3, 6, 15, 0, 0).unwrap();
        let earlier = Local.with_ymd_and_hms(2024, 3, 6, 9, 0, 0).unwrap();
        db.record_session(&FocusSession::completed_at(25, 3, later))
            .unwrap();
        db.record_session(&FocusSession::completed_at(25, 5, earlier))
            .unwrap();
        let all = db.sessions_all().unwrap();
        assert!(all[0].start_time < all[1].start_time);
    }

    #[test]
    fn task_crud() {
        let db = Database::open_memory().unwrap();
        let task = Task::new("write report", date(6), Some(2));
        db.insert_task(&task).unwrap();
        db.insert_task(&Task::new("inbox", date(6), None)).unwrap();

        let today = db.tasks_for_date(date(6)).unwrap();
        assert_eq!(today.len(), 2);
        // Core slots come first.
        assert_eq!(today[0].slot, Some(2));

        assert!(db.set_task_completed(&task.id, true).unwrap());
        assert!(!db.set_task_completed("missing", true).unwrap());
        assert!(db.tasks_for_date(date(6)).unwrap()[0].completed);

        assert!(db.delete_task(&task.id).unwrap());
        assert!(!db.delete_task(&task.id).unwrap());
        assert_eq!(db.tasks_for_date(date(6)).unwrap().len(), 1);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("engine").unwrap().is_none());
        db.kv_set("engine", "{}").unwrap();
        assert_eq!(db.kv_get("engine").unwrap().unwrap(), "{}");
        db.kv_set("engine", "{\"phase\":\"idle\"}").unwrap();
        assert_eq!(db.kv_get("engine").unwrap().unwrap(), "{\"phase\":\"idle\"}");
    }
}

use chrono::{DateTime, Local};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Emitted once per finished unit and handed to the persistence sink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitRecord {
    pub headword: String,
    pub is_article: bool,
    pub wrong_count: usize,
    /// One timestamp per accepted letter
    pub letter_times: Vec<DateTime<Local>>,
    /// Position -> incorrect characters typed there, in order
    pub mistakes: HashMap<usize, Vec<char>>,
    pub wpm: f64,
    pub rhythm_std_dev: f64,
    pub finished_at: DateTime<Local>,
}

/// Where finished-unit records go. Fire-and-forget from the session's
/// perspective; failures never reach the typing core.
pub trait RecordSink {
    fn record(&mut self, rec: &UnitRecord) -> Result<(), Box<dyn Error>>;
}

/// Sink for tests and headless runs
#[derive(Debug, Default)]
pub struct NullSink;

impl RecordSink for NullSink {
    fn record(&mut self, _rec: &UnitRecord) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// Collects records in memory; handy in integration tests
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<UnitRecord>,
}

impl RecordSink for MemorySink {
    fn record(&mut self, rec: &UnitRecord) -> Result<(), Box<dyn Error>> {
        self.records.push(rec.clone());
        Ok(())
    }
}

/// Fans a record out to several sinks; one failing sink does not stop the rest
pub struct MultiSink {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn RecordSink>>) -> Self {
        Self { sinks }
    }
}

impl RecordSink for MultiSink {
    fn record(&mut self, rec: &UnitRecord) -> Result<(), Box<dyn Error>> {
        for sink in &mut self.sinks {
            let _ = sink.record(rec);
        }
        Ok(())
    }
}

/// Sqlite-backed history of finished units
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let db_path = Self::default_db_path().unwrap_or_else(|| PathBuf::from("keydrill_records.db"));
        Self::open(&db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS unit_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                headword TEXT NOT NULL,
                is_article BOOLEAN NOT NULL,
                wrong_count INTEGER NOT NULL,
                letter_times TEXT NOT NULL,
                mistakes TEXT NOT NULL,
                wpm REAL NOT NULL,
                rhythm_std_dev REAL NOT NULL,
                finished_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_unit_records_headword ON unit_records(headword)",
            [],
        )?;

        Ok(Self { conn })
    }

    fn default_db_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "keydrill").map(|pd| pd.data_local_dir().join("records.db"))
    }

    pub fn count(&self) -> Result<i64, Box<dyn Error>> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM unit_records", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn average_wpm(&self) -> Result<Option<f64>, Box<dyn Error>> {
        let avg = self
            .conn
            .query_row("SELECT AVG(wpm) FROM unit_records", [], |row| row.get(0))
            .optional()?
            .flatten();
        Ok(avg)
    }

    /// Headwords with the most accumulated mistakes, for review
    pub fn most_missed(&self, limit: usize) -> Result<Vec<(String, i64)>, Box<dyn Error>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT headword, SUM(wrong_count) AS misses
            FROM unit_records
            WHERE wrong_count > 0
            GROUP BY headword
            ORDER BY misses DESC, headword ASC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl RecordSink for SqliteRecordStore {
    fn record(&mut self, rec: &UnitRecord) -> Result<(), Box<dyn Error>> {
        self.conn.execute(
            r#"
            INSERT INTO unit_records
            (headword, is_article, wrong_count, letter_times, mistakes, wpm, rhythm_std_dev, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                rec.headword,
                rec.is_article,
                rec.wrong_count as i64,
                serde_json::to_string(&rec.letter_times)?,
                serde_json::to_string(&rec.mistakes)?,
                rec.wpm,
                rec.rhythm_std_dev,
                rec.finished_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

/// One summary row per finished unit, appended to a csv practice log
#[derive(Debug)]
pub struct CsvPracticeLog {
    path: PathBuf,
}

impl CsvPracticeLog {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "keydrill") {
            pd.config_dir().join("practice_log.csv")
        } else {
            PathBuf::from("keydrill_practice_log.csv")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for CsvPracticeLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for CsvPracticeLog {
    fn record(&mut self, rec: &UnitRecord) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record([
                "date",
                "headword",
                "is_article",
                "chars",
                "wrong_count",
                "wpm",
                "rhythm_std_dev",
            ])?;
        }

        writer.write_record([
            rec.finished_at.to_rfc3339(),
            rec.headword.clone(),
            rec.is_article.to_string(),
            rec.letter_times.len().to_string(),
            rec.wrong_count.to_string(),
            format!("{:.2}", rec.wpm),
            format!("{:.2}", rec.rhythm_std_dev),
        ])?;
        writer.flush()?;

        Ok(())
    }
}

//! Relational sink
//!
//! Normalizes records into `companies`, `locations` and `jobs`; jobs carry
//! foreign keys to both. Companies and locations are deduplicated with a
//! lookup-or-insert per record.

use super::{Sink, SinkResult};
use crate::model::{Company, Job, Location};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn new(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        Self::initialize(conn)
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> SinkResult<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> SinkResult<Self> {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS companies (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                url TEXT,
                logo TEXT,
                actively_hiring INTEGER
            );

            CREATE TABLE IF NOT EXISTS locations (
                id INTEGER PRIMARY KEY,
                full_location TEXT NOT NULL,
                city TEXT,
                region TEXT,
                country TEXT
            );

            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY,
                url TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                posted_time TEXT,
                tags TEXT,
                criteria TEXT,
                company_id INTEGER NOT NULL REFERENCES companies(id),
                location_id INTEGER NOT NULL REFERENCES locations(id)
            );
            ",
        )?;
        Ok(Self { conn })
    }

    fn company_id(&self, company: &Company) -> SinkResult<i64> {
        let existing = self
            .conn
            .query_row(
                "SELECT id FROM companies WHERE name = ?1",
                params![company.name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn.execute(
            "INSERT INTO companies (name, url, logo, actively_hiring) VALUES (?1, ?2, ?3, ?4)",
            params![
                company.name,
                company.url,
                company.logo,
                company.actively_hiring
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn location_id(&self, location: &Location) -> SinkResult<i64> {
        let existing = self
            .conn
            .query_row(
                "SELECT id FROM locations WHERE full_location = ?1",
                params![location.full_location],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn.execute(
            "INSERT INTO locations (full_location, city, region, country) VALUES (?1, ?2, ?3, ?4)",
            params![
                location.full_location,
                location.city,
                location.region,
                location.country
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

impl Sink for SqliteSink {
    fn write(&mut self, job: &Job) -> SinkResult<()> {
        let company_id = self.company_id(&job.company)?;
        let location_id = self.location_id(&job.location)?;
        let tags = serde_json::to_string(&job.tags)?;
        let criteria = serde_json::to_string(&job.criteria)?;

        self.conn.execute(
            "INSERT INTO jobs (url, title, description, posted_time, tags, criteria, company_id, location_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                job.url,
                job.title,
                job.description,
                job.posted_time,
                tags,
                criteria,
                company_id,
                location_id
            ],
        )?;
        Ok(())
    }
}

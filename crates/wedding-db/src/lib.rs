pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;

pub use error::{Result, StoreError};

use rusqlite::{Connection, OpenFlags};
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Where the store lives, parsed from a `DATABASE_URL`-style string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// Accepts `sqlite://path`, `sqlite:path`, a bare path, or one of the
    /// in-memory spellings. Any other URL scheme is rejected.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        let rest = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if rest.is_empty() {
            return Err(StoreError::Config(url.to_string()));
        }
        if rest == ":memory:" {
            return Ok(Self::Memory);
        }
        // Some other scheme, e.g. postgres://
        if rest.contains("://") {
            return Err(StoreError::Config(url.to_string()));
        }
        Ok(Self::File(PathBuf::from(rest)))
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str(":memory:"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read-only connections opened next to the writer for file databases.
const READER_POOL_SIZE: usize = 4;

/// One writer plus a round-robin pool of read-only connections, so lists
/// never queue behind an insert. An in-memory database is private to its
/// connection and runs everything on the writer.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
    location: StoreLocation,
}

impl Database {
    pub fn open(url: &str) -> Result<Self> {
        let location = StoreLocation::parse(url)?;
        let path = match &location {
            StoreLocation::Memory => return Self::open_in_memory(),
            StoreLocation::File(path) => path.clone(),
        };

        let writer = Connection::open(&path).map_err(StoreError::Connection)?;
        // Readers only see the writer's commits without blocking it in WAL mode
        let mode: String = writer
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(StoreError::Connection)?;
        debug!("journal_mode={}", mode);

        migrations::run(&writer)?;

        let mut readers = Vec::with_capacity(READER_POOL_SIZE);
        for _ in 0..READER_POOL_SIZE {
            let conn = Connection::open_with_flags(
                &path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(StoreError::Connection)?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            location, READER_POOL_SIZE
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
            location,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Connection)?;
        migrations::run(&conn)?;

        info!("Database opened at {}", StoreLocation::Memory);
        Ok(Self {
            writer: Mutex::new(conn),
            readers: Vec::new(),
            reader_idx: AtomicUsize::new(0),
            location: StoreLocation::Memory,
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Runs `f` on a reader connection (the writer for in-memory stores).
    /// The guard is dropped on every exit path, so an error (or panic) in `f`
    /// never leaks the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        if self.readers.is_empty() {
            return self.with_conn_mut(|conn| f(conn));
        }

        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        f(&conn)
    }

    /// Runs `f` on the writer, for inserts and transactions.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .writer
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        f(&mut conn)
    }
}

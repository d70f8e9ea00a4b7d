//! Persistence layer for academy.
//!
//! Every read and write of users, students, attendance records, grades and
//! the current-user slot goes through [`Store`]. Collections are stored
//! whole under fixed keys; callers read, modify and save the full sequence.
//!
//! Payloads are JSON envelopes of the form `{"version": N, "data": ...}`.
//! A bare array or object, as written by earlier releases, is
//! read as version 0 and rewritten in the current envelope on the next save.

pub mod backend;
pub mod migrations;
pub mod schema;
pub mod seed;
pub mod sqlite;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{BackendKind, Config};
use crate::error::{Error, Result};
use crate::model::{AttendanceRecord, Grade, Student, User};

pub use backend::{Backend, MemoryBackend, UnavailableBackend};
pub use sqlite::SqliteBackend;

/// Newest payload version this build writes and reads.
pub const PAYLOAD_VERSION: u32 = 1;

/// Storage key of the current-user slot.
pub const CURRENT_USER_KEY: &str = "distinctive_current_user";

/// The named collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Login accounts.
    Users,
    /// Enrolled students.
    Students,
    /// Clock-in/clock-out sessions.
    Attendance,
    /// Graded assessments.
    Grades,
}

impl Collection {
    /// Fixed storage key for this collection.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Users => "distinctive_users",
            Self::Students => "distinctive_students",
            Self::Attendance => "distinctive_attendance",
            Self::Grades => "distinctive_grades",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Users => write!(f, "users"),
            Self::Students => write!(f, "students"),
            Self::Attendance => write!(f, "attendance"),
            Self::Grades => write!(f, "grades"),
        }
    }
}

/// A record type that lives in one of the store's collections.
pub trait Record: Serialize + DeserializeOwned {
    /// The collection this type is stored in.
    const COLLECTION: Collection;

    /// Records returned and persisted when the collection has never been written.
    fn seed() -> Vec<Self>;

    /// The record's identifier.
    fn id(&self) -> &str;
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn seed() -> Vec<Self> {
        seed::users()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Student {
    const COLLECTION: Collection = Collection::Students;

    fn seed() -> Vec<Self> {
        seed::students()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for AttendanceRecord {
    const COLLECTION: Collection = Collection::Attendance;

    fn seed() -> Vec<Self> {
        Vec::new()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Grade {
    const COLLECTION: Collection = Collection::Grades;

    fn seed() -> Vec<Self> {
        seed::grades()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T: ?Sized> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    data: Value,
}

fn encode<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: PAYLOAD_VERSION,
        data,
    })?)
}

fn decode<T: DeserializeOwned>(key: &'static str, raw: &str) -> Result<T> {
    let value: Value = serde_json::from_str(raw).map_err(|source| Error::Decode { key, source })?;

    let (version, data) = match value {
        Value::Object(map) if map.contains_key("version") && map.contains_key("data") => {
            let envelope: RawEnvelope = serde_json::from_value(Value::Object(map))
                .map_err(|source| Error::Decode { key, source })?;
            (envelope.version, envelope.data)
        }
        legacy => (0, legacy),
    };

    if version > PAYLOAD_VERSION {
        return Err(Error::SchemaVersion {
            key,
            found: version,
            supported: PAYLOAD_VERSION,
        });
    }

    serde_json::from_value(data).map_err(|source| Error::Decode { key, source })
}

/// Pick an id of the form `<prefix>-<millis>` not already used in `existing`.
#[must_use]
pub fn next_id<T: Record>(prefix: &str, now: DateTime<Utc>, existing: &[T]) -> String {
    let base = format!("{prefix}-{}", now.timestamp_millis());
    let taken = |candidate: &str| existing.iter().any(|r| r.id() == candidate);

    if !taken(&base) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Typed access to the persisted collections.
#[derive(Debug)]
pub struct Store<B> {
    backend: B,
}

impl<B: Backend> Store<B> {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read a whole collection.
    ///
    /// The first read of a collection that was never written returns its seed
    /// data and persists it. With an unavailable backend the result is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the payload cannot be decoded.
    pub fn get<T: Record>(&self) -> Result<Vec<T>> {
        let key = T::COLLECTION.key();
        if !self.backend.is_available() {
            debug!("Storage unavailable, reading {} as empty", key);
            return Ok(Vec::new());
        }

        if let Some(raw) = self.backend.read(key)? {
            return decode(key, &raw);
        }
        let records = T::seed();
        info!("Seeding {} with {} records", T::COLLECTION, records.len());
        self.save(&records)?;
        Ok(records)
    }

    /// Read a whole collection without writing anything.
    ///
    /// Like [`Store::get`], but an absent collection yields its seed data
    /// without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the payload cannot be decoded.
    pub fn peek<T: Record>(&self) -> Result<Vec<T>> {
        let key = T::COLLECTION.key();
        if !self.backend.is_available() {
            return Ok(Vec::new());
        }
        self.backend
            .read(key)?
            .map_or_else(|| Ok(T::seed()), |raw| decode(key, &raw))
    }

    /// Replace a whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend fails.
    pub fn save<T: Record>(&self, records: &[T]) -> Result<()> {
        let key = T::COLLECTION.key();
        if !self.backend.is_available() {
            debug!("Storage unavailable, dropping write to {}", key);
            return Ok(());
        }

        self.backend.write(key, &encode(records)?)?;
        debug!("Saved {} {} records", records.len(), T::COLLECTION);
        Ok(())
    }

    /// Persist a closed attendance session and the credited student together.
    ///
    /// Both collections are written in one atomic backend batch.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend fails; neither
    /// collection is changed in that case.
    pub fn close_session(&self, records: &[AttendanceRecord], students: &[Student]) -> Result<()> {
        if !self.backend.is_available() {
            debug!("Storage unavailable, dropping session close");
            return Ok(());
        }

        self.backend.write_batch(&[
            (AttendanceRecord::COLLECTION.key(), encode(records)?),
            (Student::COLLECTION.key(), encode(students)?),
        ])
    }

    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the payload cannot be decoded.
    pub fn current_user(&self) -> Result<Option<User>> {
        if !self.backend.is_available() {
            return Ok(None);
        }

        self.backend
            .read(CURRENT_USER_KEY)?
            .map(|raw| decode(CURRENT_USER_KEY, &raw))
            .transpose()
    }

    /// Set or clear the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend fails.
    pub fn set_current_user(&self, user: Option<&User>) -> Result<()> {
        if !self.backend.is_available() {
            return Ok(());
        }

        match user {
            Some(user) => self.backend.write(CURRENT_USER_KEY, &encode(user)?),
            None => self.backend.remove(CURRENT_USER_KEY),
        }
    }
}

impl Store<Box<dyn Backend>> {
    /// Open the backend selected in the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the `SQLite` database cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend: Box<dyn Backend> = match config.storage.backend {
            BackendKind::Sqlite => Box::new(SqliteBackend::open(config.database_path())?),
            BackendKind::Memory => Box::new(MemoryBackend::new()),
            BackendKind::Unavailable => Box::new(UnavailableBackend),
        };
        Ok(Self::new(backend))
    }
}

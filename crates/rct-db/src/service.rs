//! Service layer over the database handle.
//!
//! `RctService` wraps `RctDb` and the clock used for "today" and "now". All
//! repo methods are implemented as `impl RctService` blocks under
//! [`crate::repos`].

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

use crate::RctDb;
use crate::error::DatabaseError;
use crate::retry::RetryConfig;

/// Entry point for every persistence operation.
pub struct RctService {
    db: RctDb,
    offset: Option<FixedOffset>,
    retry: RetryConfig,
}

impl RctService {
    /// Open a local database and wrap it.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = RctDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `RctDb`.
    #[must_use]
    pub fn from_db(db: RctDb) -> Self {
        Self {
            db,
            offset: None,
            retry: RetryConfig::default(),
        }
    }

    /// Use a fixed UTC offset instead of the system local zone.
    #[must_use]
    pub const fn with_fixed_offset(mut self, offset: Option<FixedOffset>) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &RctDb {
        &self.db
    }

    #[must_use]
    pub const fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// The configured fixed offset, if any. `None` means the system zone.
    #[must_use]
    pub const fn fixed_offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// Current instant at the service's offset right now.
    ///
    /// The offset is frozen, so day boundaries derived from this value can be
    /// an hour off across a DST change; use [`Local::now`] directly for those
    /// when no fixed offset is configured.
    #[must_use]
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.offset.map_or_else(
            || Local::now().fixed_offset(),
            |offset| Utc::now().with_timezone(&offset),
        )
    }

    /// Today's calendar date in the service's zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

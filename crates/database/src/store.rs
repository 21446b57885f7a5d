use crate::error::DbError;
use async_trait::async_trait;
use core_types::{DigimonRecord, PageRequest, Stage, StageCount};
use serde_json::Value as JsonValue;

/// The outcome of a single-row lookup.
///
/// "No such row" is a regular result here, so callers never have to inspect
/// driver-specific error codes to tell it apart from a real failure.
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Absent,
    Failed(DbError),
}

impl<T> Lookup<T> {
    /// Classifies the result of a `fetch_optional` (or `fetch_one`) call.
    pub fn from_query(result: Result<Option<T>, sqlx::Error>) -> Self {
        match result {
            Ok(Some(row)) => Lookup::Found(row),
            Ok(None) | Err(sqlx::Error::RowNotFound) => Lookup::Absent,
            Err(e) => Lookup::Failed(e.into()),
        }
    }

    pub fn into_result(self) -> Result<Option<T>, DbError> {
        match self {
            Lookup::Found(row) => Ok(Some(row)),
            Lookup::Absent => Ok(None),
            Lookup::Failed(e) => Err(e),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }
}

/// One page of records plus the number of rows matching the filter overall.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage {
    pub rows: Vec<DigimonRecord>,
    pub total: i64,
}

/// The read-only data-access interface over the Digimon dataset.
///
/// `DbRepository` is the PostgreSQL implementation; anything else (e.g. the
/// in-memory store behind the `test-util` feature) can be injected instead.
/// Record lists are always ordered by `number` (missing last), then `id`.
#[async_trait]
pub trait DigimonStore: Send + Sync {
    /// Fetches one page of records, optionally restricted to an exact stage.
    async fn list_page(
        &self,
        stage: Option<Stage>,
        page: PageRequest,
    ) -> Result<RecordPage, DbError>;

    /// Counts records, optionally restricted to an exact stage.
    async fn count(&self, stage: Option<Stage>) -> Result<i64, DbError>;

    async fn find_by_id(&self, id: i64) -> Lookup<DigimonRecord>;

    /// Exact, case-sensitive name match.
    async fn find_by_name(&self, name: &str) -> Lookup<DigimonRecord>;

    /// Case-insensitive substring match on the name, at most `limit` rows.
    async fn search_by_name(&self, term: &str, limit: i64)
    -> Result<Vec<DigimonRecord>, DbError>;

    /// Records that the given Digimon evolves into.
    async fn evolutions_from(&self, id: i64) -> Result<Vec<DigimonRecord>, DbError>;

    /// Records that evolve into the given Digimon.
    async fn evolutions_to(&self, id: i64) -> Result<Vec<DigimonRecord>, DbError>;

    /// Raw requirement rows attached to the given Digimon.
    async fn requirements_for(&self, id: i64) -> Result<Vec<JsonValue>, DbError>;

    /// Per-stage totals computed by the backend-side aggregate procedure.
    async fn count_by_stage(&self) -> Result<Vec<StageCount>, DbError>;
}

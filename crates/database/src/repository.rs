use crate::DbError;
use crate::store::{DigimonStore, Lookup, RecordPage};
use async_trait::async_trait;
use core_types::{DigimonRecord, PageRequest, Stage, StageCount};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPool;

/// The public columns of `digimons d`, normalized to the types `DigimonRecord`
/// decodes.
const DIGIMON_COLUMNS: &str = "d.id::int8 AS id, \
     d.number::int8 AS number, \
     d.name::text AS name, \
     d.stage::text AS stage, \
     d.attribute::text AS attribute, \
     d.image_url::text AS image_url";

/// Stable ordering for every record list, so identical requests return identical bodies.
const DIGIMON_ORDER: &str = "d.number ASC NULLS LAST, d.id ASC";

/// The backend-side procedure returning `(stage, count)` rows.
const STAGE_STATS_PROCEDURE: &str = "get_digimon_stats_by_stage";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_records(
        &self,
        sql: &str,
        id: i64,
    ) -> Result<Vec<DigimonRecord>, DbError> {
        let rows = sqlx::query_as::<_, DigimonRecord>(sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Escapes `%`, `_` and the escape character itself so the term matches literally
/// inside an `ILIKE` pattern.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl DigimonStore for DbRepository {
    async fn list_page(
        &self,
        stage: Option<Stage>,
        page: PageRequest,
    ) -> Result<RecordPage, DbError> {
        let sql = format!(
            "SELECT {DIGIMON_COLUMNS} FROM digimons d \
             WHERE ($1::text IS NULL OR d.stage::text = $1) \
             ORDER BY {DIGIMON_ORDER} \
             LIMIT $2 OFFSET $3"
        );
        let rows_query = sqlx::query_as::<_, DigimonRecord>(&sql)
            .bind(stage.map(|s| s.as_str()))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool);

        let (rows, total) = tokio::try_join!(
            async { rows_query.await.map_err(DbError::from) },
            self.count(stage)
        )?;

        Ok(RecordPage { rows, total })
    }

    async fn count(&self, stage: Option<Stage>) -> Result<i64, DbError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM digimons d WHERE ($1::text IS NULL OR d.stage::text = $1)",
        )
        .bind(stage.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn find_by_id(&self, id: i64) -> Lookup<DigimonRecord> {
        let sql = format!("SELECT {DIGIMON_COLUMNS} FROM digimons d WHERE d.id = $1");
        let result = sqlx::query_as::<_, DigimonRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        Lookup::from_query(result)
    }

    async fn find_by_name(&self, name: &str) -> Lookup<DigimonRecord> {
        // Names are not unique in storage; the lowest id wins.
        let sql = format!(
            "SELECT {DIGIMON_COLUMNS} FROM digimons d WHERE d.name = $1 ORDER BY d.id ASC LIMIT 1"
        );
        let result = sqlx::query_as::<_, DigimonRecord>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await;
        Lookup::from_query(result)
    }

    async fn search_by_name(
        &self,
        term: &str,
        limit: i64,
    ) -> Result<Vec<DigimonRecord>, DbError> {
        let sql = format!(
            r"SELECT {DIGIMON_COLUMNS} FROM digimons d
              WHERE d.name ILIKE $1 ESCAPE '\'
              ORDER BY {DIGIMON_ORDER}
              LIMIT $2"
        );
        let pattern = format!("%{}%", escape_like(term));
        let rows = sqlx::query_as::<_, DigimonRecord>(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn evolutions_from(&self, id: i64) -> Result<Vec<DigimonRecord>, DbError> {
        let sql = format!(
            "SELECT {DIGIMON_COLUMNS} FROM evolutions e \
             JOIN digimons d ON d.id = e.to_digimon_id \
             WHERE e.from_digimon_id = $1 \
             ORDER BY {DIGIMON_ORDER}"
        );
        self.fetch_records(&sql, id).await
    }

    async fn evolutions_to(&self, id: i64) -> Result<Vec<DigimonRecord>, DbError> {
        let sql = format!(
            "SELECT {DIGIMON_COLUMNS} FROM evolutions e \
             JOIN digimons d ON d.id = e.from_digimon_id \
             WHERE e.to_digimon_id = $1 \
             ORDER BY {DIGIMON_ORDER}"
        );
        self.fetch_records(&sql, id).await
    }

    async fn requirements_for(&self, id: i64) -> Result<Vec<JsonValue>, DbError> {
        let rows = sqlx::query_scalar::<_, JsonValue>(
            "SELECT to_jsonb(r) FROM requirements r \
             WHERE r.digimon_id = $1 \
             ORDER BY to_jsonb(r)::text",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_stage(&self) -> Result<Vec<StageCount>, DbError> {
        let sql = format!(
            "SELECT s.stage::text AS stage, s.count::int8 AS count FROM {STAGE_STATS_PROCEDURE}() AS s"
        );
        let rows = sqlx::query_as::<_, StageCount>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

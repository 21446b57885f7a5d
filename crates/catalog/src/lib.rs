use crate::error::CatalogError;
use core_types::{
    DigimonStats, DigimonSummary, EvolutionData, PageRequest, Pagination, Stage, format_digimon,
};
use database::{DbError, DigimonStore};
use serde::Serialize;
use std::sync::Arc;

pub mod error;

const LIST_FAILED: &str = "Erro ao buscar Digimons";
const GET_BY_ID_FAILED: &str = "Erro ao buscar Digimon por ID";
const GET_BY_NAME_FAILED: &str = "Erro ao buscar Digimon por nome";
const SEARCH_FAILED: &str = "Erro ao pesquisar Digimons";
const EVOLUTIONS_FAILED: &str = "Erro ao buscar dados de evolução";
const STATS_FAILED: &str = "Erro ao buscar estatísticas";

/// Upper bound on the rows a single search may return.
pub const MAX_SEARCH_LIMIT: i64 = 50;

/// A page of formatted Digimon with its pagination block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigimonPage {
    pub data: Vec<DigimonSummary>,
    pub pagination: Pagination,
}

/// The query service. Every operation issues one or more store calls, projects
/// the rows through the formatter and turns backend failures into
/// `CatalogError::Backend`.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn DigimonStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn DigimonStore>) -> Self {
        Self { store }
    }

    /// Lists one page of Digimon, optionally restricted to a single stage.
    pub async fn list(
        &self,
        page: PageRequest,
        stage: Option<Stage>,
    ) -> Result<DigimonPage, CatalogError> {
        let result = self
            .store
            .list_page(stage, page)
            .await
            .map_err(|e| backend_error(LIST_FAILED, e))?;

        Ok(DigimonPage {
            data: result.rows.iter().map(DigimonSummary::from).collect(),
            pagination: Pagination::new(page, result.total),
        })
    }

    /// Returns `None` when no Digimon has this id.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<DigimonSummary>, CatalogError> {
        let record = self
            .store
            .find_by_id(id)
            .await
            .into_result()
            .map_err(|e| backend_error(GET_BY_ID_FAILED, e))?;
        Ok(format_digimon(record.as_ref()))
    }

    /// Exact, case-sensitive name lookup. Returns `None` when nothing matches.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<DigimonSummary>, CatalogError> {
        let record = self
            .store
            .find_by_name(name)
            .await
            .into_result()
            .map_err(|e| backend_error(GET_BY_NAME_FAILED, e))?;
        Ok(format_digimon(record.as_ref()))
    }

    /// Case-insensitive substring search on the name. No match is an empty list.
    ///
    /// `limit` is clamped to `[1, MAX_SEARCH_LIMIT]` before it reaches the store.
    pub async fn search(
        &self,
        term: &str,
        limit: i64,
    ) -> Result<Vec<DigimonSummary>, CatalogError> {
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        let rows = self
            .store
            .search_by_name(term, limit)
            .await
            .map_err(|e| backend_error(SEARCH_FAILED, e))?;
        Ok(rows.into_iter().map(DigimonSummary::from).collect())
    }

    /// Fetches a Digimon and its one-hop evolution neighbourhood.
    ///
    /// If the Digimon does not exist nothing else is queried. Otherwise the
    /// forward edges, backward edges and requirements are fetched concurrently;
    /// any failure among them fails the whole call and drops the other results.
    pub async fn get_evolution_data(&self, id: i64) -> Result<EvolutionData, CatalogError> {
        let base = self
            .store
            .find_by_id(id)
            .await
            .into_result()
            .map_err(|e| backend_error(EVOLUTIONS_FAILED, e))?;

        let Some(base) = base else {
            tracing::debug!(id, "Digimon not found; skipping evolution queries.");
            return Ok(EvolutionData::absent());
        };

        let (evolves_to, evolves_from, requirements) = tokio::try_join!(
            self.store.evolutions_from(id),
            self.store.evolutions_to(id),
            self.store.requirements_for(id),
        )
        .map_err(|e| backend_error(EVOLUTIONS_FAILED, e))?;

        Ok(EvolutionData {
            digimon: Some(DigimonSummary::from(base)),
            evolves_to: evolves_to.into_iter().map(DigimonSummary::from).collect(),
            evolves_from: evolves_from.into_iter().map(DigimonSummary::from).collect(),
            requirements,
        })
    }

    /// Total number of Digimon and the per-stage breakdown.
    pub async fn get_stats(&self) -> Result<DigimonStats, CatalogError> {
        let (total, by_stage) =
            tokio::try_join!(self.store.count(None), self.store.count_by_stage())
                .map_err(|e| backend_error(STATS_FAILED, e))?;

        Ok(DigimonStats { total, by_stage })
    }
}

/// Logs the backend failure once and hides it behind a client-safe message.
fn backend_error(message: &'static str, source: DbError) -> CatalogError {
    tracing::error!(error = ?source, "{message}");
    CatalogError::Backend { message, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::DigimonRecord;
    use database::{MemoryStore, StoreOp};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(id: i64, name: &str, stage: &str) -> DigimonRecord {
        DigimonRecord {
            id,
            number: Some(id),
            name: name.to_string(),
            stage: Some(stage.to_string()),
            attribute: Some("Vaccine".to_string()),
            image_url: Some(format!("https://example.org/{id}.png")),
        }
    }

    fn sample_store() -> MemoryStore {
        MemoryStore::new(vec![
            record(1, "Koromon", "II"),
            record(2, "Agumon", "III"),
            record(3, "Greymon", "IV"),
            record(4, "MetalGreymon", "V"),
        ])
        .with_evolution(1, 2)
        .with_evolution(2, 3)
        .with_evolution(3, 4)
        .with_requirement(2, json!({ "digimon_id": 2, "level": 11 }))
    }

    fn catalog(store: MemoryStore) -> (Catalog, Arc<MemoryStore>) {
        let store = Arc::new(store);
        (Catalog::new(store.clone()), store)
    }

    #[tokio::test]
    async fn list_builds_pagination_from_total() {
        let records = (1..=125).map(|i| record(i, &format!("Mon{i}"), "III")).collect();
        let (catalog, _) = catalog(MemoryStore::new(records));

        let page = catalog.list(PageRequest::new(3, 50), None).await.unwrap();

        assert_eq!(page.data.len(), 25);
        assert_eq!(page.data[0].id, 101);
        assert_eq!(
            page.pagination,
            Pagination {
                page: 3,
                limit: 50,
                total: 125,
                total_pages: 3
            }
        );
    }

    #[tokio::test]
    async fn zero_limit_page_is_raised_to_one() {
        let (catalog, _) = catalog(sample_store());

        let page = catalog.list(PageRequest::new(1, 0), None).await.unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.limit, 1);
        assert_eq!(page.pagination.total_pages, 4);
    }

    #[tokio::test]
    async fn list_applies_stage_filter() {
        let (catalog, _) = catalog(sample_store());
        let page = catalog
            .list(PageRequest::default(), Some(Stage::IV))
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.data[0].name, "Greymon");
    }

    #[tokio::test]
    async fn list_failure_is_a_backend_error() {
        let (catalog, _) = catalog(sample_store().failing(StoreOp::ListPage));
        let err = catalog.list(PageRequest::default(), None).await.unwrap_err();
        assert_eq!(err.message(), LIST_FAILED);
    }

    #[tokio::test]
    async fn get_by_id_formats_the_record() {
        let (catalog, _) = catalog(sample_store());
        let summary = catalog.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(summary.name, "Agumon");
        assert_eq!(summary.image_url.as_deref(), Some("https://example.org/2.png"));
    }

    #[tokio::test]
    async fn missing_id_is_absence_not_error() {
        let (catalog, _) = catalog(sample_store());
        assert_eq!(catalog.get_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn lookup_failure_is_a_backend_error() {
        let (catalog, _) = catalog(sample_store().failing(StoreOp::FindById));
        let err = catalog.get_by_id(1).await.unwrap_err();
        assert_eq!(err.message(), GET_BY_ID_FAILED);
    }

    #[tokio::test]
    async fn get_by_name_is_case_sensitive() {
        let (catalog, _) = catalog(sample_store());
        assert!(catalog.get_by_name("Agumon").await.unwrap().is_some());
        assert_eq!(catalog.get_by_name("agumon").await.unwrap(), None);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_limited() {
        let (catalog, _) = catalog(sample_store());

        let all = catalog.search("GREY", 10).await.unwrap();
        let names: Vec<&str> = all.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Greymon", "MetalGreymon"]);

        let limited = catalog.search("grey", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn search_limit_is_clamped_before_the_store() {
        let records = (1..=60).map(|i| record(i, &format!("Mon{i}"), "III")).collect();
        let (catalog, _) = catalog(MemoryStore::new(records));

        assert_eq!(catalog.search("mon", -5).await.unwrap().len(), 1);
        assert_eq!(catalog.search("mon", 0).await.unwrap().len(), 1);
        assert_eq!(
            catalog.search("mon", 500).await.unwrap().len(),
            MAX_SEARCH_LIMIT as usize
        );
    }

    #[tokio::test]
    async fn search_without_matches_is_empty() {
        let (catalog, _) = catalog(sample_store());
        assert!(catalog.search("Gatomon", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn evolution_data_merges_both_directions_and_requirements() {
        let (catalog, _) = catalog(sample_store());

        let data = catalog.get_evolution_data(2).await.unwrap();

        assert_eq!(data.digimon.unwrap().name, "Agumon");
        assert_eq!(data.evolves_to.len(), 1);
        assert_eq!(data.evolves_to[0].name, "Greymon");
        assert_eq!(data.evolves_from.len(), 1);
        assert_eq!(data.evolves_from[0].name, "Koromon");
        assert_eq!(data.requirements, vec![json!({ "digimon_id": 2, "level": 11 })]);
    }

    #[tokio::test]
    async fn evolution_data_for_missing_id_issues_no_further_queries() {
        let (catalog, store) = catalog(sample_store());

        let data = catalog.get_evolution_data(999).await.unwrap();

        assert_eq!(data, EvolutionData::absent());
        assert_eq!(store.calls(), vec![StoreOp::FindById]);
    }

    #[tokio::test]
    async fn any_fan_out_failure_fails_the_whole_operation() {
        for op in [
            StoreOp::EvolutionsFrom,
            StoreOp::EvolutionsTo,
            StoreOp::RequirementsFor,
        ] {
            let (catalog, _) = catalog(sample_store().failing(op));
            let err = catalog.get_evolution_data(2).await.unwrap_err();
            assert_eq!(err.message(), EVOLUTIONS_FAILED, "failing {op:?}");
        }
    }

    #[tokio::test]
    async fn stats_combine_total_and_stage_counts() {
        let (catalog, _) = catalog(sample_store());

        let stats = catalog.get_stats().await.unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_stage.len(), 4);
        assert!(stats.by_stage.iter().all(|s| s.count == 1));
    }

    #[tokio::test]
    async fn stats_fail_when_either_call_fails() {
        for op in [StoreOp::Count, StoreOp::CountByStage] {
            let (catalog, _) = catalog(sample_store().failing(op));
            let err = catalog.get_stats().await.unwrap_err();
            assert_eq!(err.message(), STATS_FAILED);
        }
    }
}

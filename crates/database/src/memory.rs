//! An in-memory `DigimonStore` for tests.
//!
//! It mirrors the ordering and matching rules of `DbRepository`, records every
//! call it receives and can be told to fail individual operations.

use crate::DbError;
use crate::store::{DigimonStore, Lookup, RecordPage};
use async_trait::async_trait;
use core_types::{DigimonRecord, PageRequest, Stage, StageCount};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

/// The store operations, as recorded by `MemoryStore::calls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListPage,
    Count,
    FindById,
    FindByName,
    SearchByName,
    EvolutionsFrom,
    EvolutionsTo,
    RequirementsFor,
    CountByStage,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<DigimonRecord>,
    /// Directed `(from, to)` edges.
    evolutions: Vec<(i64, i64)>,
    requirements: Vec<(i64, JsonValue)>,
    failing: HashSet<StoreOp>,
    calls: Mutex<Vec<StoreOp>>,
}

impl MemoryStore {
    pub fn new(records: Vec<DigimonRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn with_evolution(mut self, from: i64, to: i64) -> Self {
        self.evolutions.push((from, to));
        self
    }

    pub fn with_requirement(mut self, digimon_id: i64, requirement: JsonValue) -> Self {
        self.requirements.push((digimon_id, requirement));
        self
    }

    /// Makes every call to `op` fail with a query error.
    pub fn failing(mut self, op: StoreOp) -> Self {
        self.failing.insert(op);
        self
    }

    /// Every operation received so far, in call order.
    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn enter(&self, op: StoreOp) -> Result<(), DbError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(op);
        }
        if self.failing.contains(&op) {
            return Err(DbError::QueryError(sqlx::Error::Protocol(format!(
                "injected failure for {op:?}"
            ))));
        }
        Ok(())
    }

    fn sorted(mut rows: Vec<DigimonRecord>) -> Vec<DigimonRecord> {
        rows.sort_by_key(|r| (r.number.is_none(), r.number, r.id));
        rows
    }

    fn matching_stage(&self, stage: Option<Stage>) -> Vec<DigimonRecord> {
        self.records
            .iter()
            .filter(|r| stage.is_none_or(|s| r.stage.as_deref() == Some(s.as_str())))
            .cloned()
            .collect()
    }

    fn by_ids(&self, ids: impl Iterator<Item = i64>) -> Vec<DigimonRecord> {
        let ids: HashSet<i64> = ids.collect();
        let rows = self
            .records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect();
        Self::sorted(rows)
    }
}

#[async_trait]
impl DigimonStore for MemoryStore {
    async fn list_page(
        &self,
        stage: Option<Stage>,
        page: PageRequest,
    ) -> Result<RecordPage, DbError> {
        self.enter(StoreOp::ListPage)?;
        let matching = Self::sorted(self.matching_stage(stage));
        let total = matching.len() as i64;
        let rows = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(RecordPage { rows, total })
    }

    async fn count(&self, stage: Option<Stage>) -> Result<i64, DbError> {
        self.enter(StoreOp::Count)?;
        Ok(self.matching_stage(stage).len() as i64)
    }

    async fn find_by_id(&self, id: i64) -> Lookup<DigimonRecord> {
        if let Err(e) = self.enter(StoreOp::FindById) {
            return Lookup::Failed(e);
        }
        match self.records.iter().find(|r| r.id == id) {
            Some(record) => Lookup::Found(record.clone()),
            None => Lookup::Absent,
        }
    }

    async fn find_by_name(&self, name: &str) -> Lookup<DigimonRecord> {
        if let Err(e) = self.enter(StoreOp::FindByName) {
            return Lookup::Failed(e);
        }
        match self
            .records
            .iter()
            .filter(|r| r.name == name)
            .min_by_key(|r| r.id)
        {
            Some(record) => Lookup::Found(record.clone()),
            None => Lookup::Absent,
        }
    }

    async fn search_by_name(
        &self,
        term: &str,
        limit: i64,
    ) -> Result<Vec<DigimonRecord>, DbError> {
        self.enter(StoreOp::SearchByName)?;
        let needle = term.to_lowercase();
        let matching = self
            .records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::sorted(matching)
            .into_iter()
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn evolutions_from(&self, id: i64) -> Result<Vec<DigimonRecord>, DbError> {
        self.enter(StoreOp::EvolutionsFrom)?;
        let targets = self
            .evolutions
            .iter()
            .filter(|(from, _)| *from == id)
            .map(|(_, to)| *to);
        Ok(self.by_ids(targets))
    }

    async fn evolutions_to(&self, id: i64) -> Result<Vec<DigimonRecord>, DbError> {
        self.enter(StoreOp::EvolutionsTo)?;
        let sources = self
            .evolutions
            .iter()
            .filter(|(_, to)| *to == id)
            .map(|(from, _)| *from);
        Ok(self.by_ids(sources))
    }

    async fn requirements_for(&self, id: i64) -> Result<Vec<JsonValue>, DbError> {
        self.enter(StoreOp::RequirementsFor)?;
        Ok(self
            .requirements
            .iter()
            .filter(|(digimon_id, _)| *digimon_id == id)
            .map(|(_, requirement)| requirement.clone())
            .collect())
    }

    async fn count_by_stage(&self) -> Result<Vec<StageCount>, DbError> {
        self.enter(StoreOp::CountByStage)?;
        let mut counts: BTreeMap<Option<String>, i64> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.stage.clone()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(stage, count)| StageCount { stage, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, number: Option<i64>, name: &str, stage: &str) -> DigimonRecord {
        DigimonRecord {
            id,
            number,
            name: name.to_string(),
            stage: Some(stage.to_string()),
            attribute: None,
            image_url: None,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            record(3, Some(2), "Gabumon", "III"),
            record(1, Some(1), "Agumon", "III"),
            record(2, None, "Greymon", "IV"),
        ])
    }

    #[tokio::test]
    async fn lists_in_number_order_with_missing_numbers_last() {
        let page = store()
            .list_page(None, PageRequest::new(1, 10))
            .await
            .unwrap();
        let ids: Vec<i64> = page.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn stage_filter_is_applied_before_slicing() {
        let page = store()
            .list_page(Some(Stage::III), PageRequest::new(2, 1))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.rows[0].name, "Gabumon");
    }

    #[tokio::test]
    async fn injected_failures_are_recorded() {
        let store = store().failing(StoreOp::Count);
        assert!(store.count(None).await.is_err());
        assert_eq!(store.calls(), vec![StoreOp::Count]);
    }
}

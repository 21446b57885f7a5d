use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// A row of the `digimons` table, as the repository hands it over.
///
/// Only the six public columns are selected; nothing else is read from storage.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Deserialize)]
pub struct DigimonRecord {
    pub id: i64,
    pub number: Option<i64>,
    pub name: String,
    pub stage: Option<String>,
    pub attribute: Option<String>,
    pub image_url: Option<String>,
}

/// The public projection of a Digimon returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigimonSummary {
    pub id: i64,
    pub number: Option<i64>,
    pub name: String,
    pub stage: Option<String>,
    pub attribute: Option<String>,
    pub image_url: Option<String>,
}

/// A Digimon together with its one-hop evolution neighbourhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionData {
    pub digimon: Option<DigimonSummary>,
    /// Digimon this one evolves into.
    #[serde(default)]
    pub evolves_to: Vec<DigimonSummary>,
    /// Digimon that evolve into this one.
    #[serde(default)]
    pub evolves_from: Vec<DigimonSummary>,
    /// Raw `requirements` rows keyed by this Digimon's id.
    #[serde(default)]
    pub requirements: Vec<JsonValue>,
}

impl EvolutionData {
    /// The result for an id with no matching Digimon.
    pub fn absent() -> Self {
        Self {
            digimon: None,
            evolves_to: Vec::new(),
            evolves_from: Vec::new(),
            requirements: Vec::new(),
        }
    }
}

/// One row of the per-stage aggregate procedure.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigimonStats {
    pub total: i64,
    pub by_stage: Vec<StageCount>,
}

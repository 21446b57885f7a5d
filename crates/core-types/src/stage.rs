use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The evolutionary tier a Digimon belongs to.
///
/// Serialized as the exact label stored in the `digimons.stage` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "I")]
    I,
    #[serde(rename = "II")]
    II,
    #[serde(rename = "III")]
    III,
    #[serde(rename = "IV")]
    IV,
    #[serde(rename = "V")]
    V,
    #[serde(rename = "VI")]
    VI,
    #[serde(rename = "VI+")]
    VIPlus,
    #[serde(rename = "Armor")]
    Armor,
    #[serde(rename = "Human Hybrid")]
    HumanHybrid,
    #[serde(rename = "Beast Hybrid")]
    BeastHybrid,
    #[serde(rename = "Fusion Hybrid")]
    FusionHybrid,
    #[serde(rename = "Golden Armor")]
    GoldenArmor,
    #[serde(rename = "Transcendent Hybrid")]
    TranscendentHybrid,
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Stage {
    /// Every stage, in tier order.
    pub const ALL: [Stage; 15] = [
        Stage::I,
        Stage::II,
        Stage::III,
        Stage::IV,
        Stage::V,
        Stage::VI,
        Stage::VIPlus,
        Stage::Armor,
        Stage::HumanHybrid,
        Stage::BeastHybrid,
        Stage::FusionHybrid,
        Stage::GoldenArmor,
        Stage::TranscendentHybrid,
        Stage::Unknown,
        Stage::NotApplicable,
    ];

    /// Returns the label as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::I => "I",
            Stage::II => "II",
            Stage::III => "III",
            Stage::IV => "IV",
            Stage::V => "V",
            Stage::VI => "VI",
            Stage::VIPlus => "VI+",
            Stage::Armor => "Armor",
            Stage::HumanHybrid => "Human Hybrid",
            Stage::BeastHybrid => "Beast Hybrid",
            Stage::FusionHybrid => "Fusion Hybrid",
            Stage::GoldenArmor => "Golden Armor",
            Stage::TranscendentHybrid => "Transcendent Hybrid",
            Stage::Unknown => "Unknown",
            Stage::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput("stage".to_string(), s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn serde_uses_stored_labels() {
        assert_eq!(serde_json::to_string(&Stage::VIPlus).unwrap(), "\"VI+\"");
        assert_eq!(
            serde_json::from_str::<Stage>("\"Golden Armor\"").unwrap(),
            Stage::GoldenArmor
        );
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "Mega".parse::<Stage>().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput("stage".to_string(), "Mega".to_string())
        );
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!("armor".parse::<Stage>().is_err());
    }
}

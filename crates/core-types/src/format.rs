use crate::digimon::{DigimonRecord, DigimonSummary};

impl From<&DigimonRecord> for DigimonSummary {
    fn from(record: &DigimonRecord) -> Self {
        Self {
            id: record.id,
            number: record.number,
            name: record.name.clone(),
            stage: record.stage.clone(),
            attribute: record.attribute.clone(),
            image_url: record.image_url.clone(),
        }
    }
}

impl From<DigimonRecord> for DigimonSummary {
    fn from(record: DigimonRecord) -> Self {
        Self {
            id: record.id,
            number: record.number,
            name: record.name,
            stage: record.stage,
            attribute: record.attribute,
            image_url: record.image_url,
        }
    }
}

/// Projects a stored record down to the public field set.
///
/// `None` in gives `None` out; every column other than the six public ones is dropped.
pub fn format_digimon(record: Option<&DigimonRecord>) -> Option<DigimonSummary> {
    record.map(DigimonSummary::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn gabumon() -> DigimonRecord {
        DigimonRecord {
            id: 7,
            number: Some(12),
            name: "Gabumon".to_string(),
            stage: Some("III".to_string()),
            attribute: Some("Data".to_string()),
            image_url: Some("https://example.org/gabumon.png".to_string()),
        }
    }

    #[test]
    fn projects_the_public_fields_only() {
        let summary = format_digimon(Some(&gabumon())).unwrap();
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            json!({
                "id": 7,
                "number": 12,
                "name": "Gabumon",
                "stage": "III",
                "attribute": "Data",
                "imageUrl": "https://example.org/gabumon.png"
            })
        );
    }

    #[test]
    fn absence_passes_through() {
        assert_eq!(format_digimon(None), None);
    }

    #[test]
    fn owned_and_borrowed_projection_agree() {
        let record = gabumon();
        assert_eq!(DigimonSummary::from(&record), DigimonSummary::from(record));
    }
}

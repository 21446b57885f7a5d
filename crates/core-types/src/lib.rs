pub mod digimon;
pub mod error;
pub mod format;
pub mod pagination;
pub mod stage;

// Re-export the core types to provide a clean public API.
pub use digimon::{DigimonRecord, DigimonStats, DigimonSummary, EvolutionData, StageCount};
pub use error::CoreError;
pub use format::format_digimon;
pub use pagination::{PageRequest, Pagination};
pub use stage::Stage;

use crate::responses::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog::error::CatalogError;
use thiserror::Error;

pub const DIGIMON_NOT_FOUND: &str = "Digimon não encontrado";

#[derive(Error, Debug)]
pub enum AppError {
    /// Bad or missing input; raised before the catalog is called.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl AppError {
    pub fn digimon_not_found() -> Self {
        AppError::NotFound(DIGIMON_NOT_FOUND.to_string())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(message) => {
                tracing::debug!(%message, "Rejected request input.");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            // Already logged with its cause where it was detected.
            AppError::Catalog(catalog_err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                catalog_err.message().to_string(),
            ),
        };

        let body = Json(ErrorResponse::new(error_message, status.as_u16()));
        (status, body).into_response()
    }
}

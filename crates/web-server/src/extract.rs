//! `Query` and `Path` wrappers whose rejections become `AppError::Validation`,
//! so malformed requests get the same JSON error envelope as every other 400.

use crate::error::AppError;
use axum::extract::{
    FromRequestParts, Path, Query,
    rejection::{PathRejection, QueryRejection},
};

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!(
            "Parâmetros de consulta inválidos: {}",
            rejection.body_text()
        ))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("Caminho inválido: {}", rejection.body_text()))
    }
}

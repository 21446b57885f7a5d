use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// A backend query failed. `message` is safe to show to clients; the
    /// underlying cause is only logged.
    #[error("{message}")]
    Backend {
        message: &'static str,
        #[source]
        source: database::DbError,
    },
}

impl CatalogError {
    pub fn message(&self) -> &'static str {
        match self {
            CatalogError::Backend { message, .. } => message,
        }
    }
}

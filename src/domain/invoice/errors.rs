use super::value_objects::ValueObjectError;
use thiserror::Error;

/// Errors surfaced by the invoice use cases
#[derive(Debug, Error)]
pub enum InvoiceError {
  /// Caller input rejected before any store interaction
  #[error(transparent)]
  Validation(#[from] ValueObjectError),

  #[error("find service error: {0}")]
  Find(#[source] RepositoryError),

  #[error("insert error: {0}")]
  Insert(#[source] RepositoryError),
}

impl InvoiceError {
  pub fn is_validation(&self) -> bool {
    matches!(self, InvoiceError::Validation(_))
  }
}

/// Store faults: connectivity, constraint violations and decode failures
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Invalid {column} value '{value}': {source}")]
  InvalidDate {
    column: &'static str,
    value: String,
    #[source]
    source: chrono::ParseError,
  },

  #[error("Invalid stored status: {0}")]
  InvalidStatus(#[source] ValueObjectError),

  #[error("Store did not return the inserted row")]
  MissingInsertedRow,

  #[error("Store call timed out after {0} seconds")]
  Timeout(u64),
}

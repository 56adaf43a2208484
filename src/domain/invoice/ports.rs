use async_trait::async_trait;
use chrono::NaiveDate;

use super::entities::Invoice;
use super::errors::RepositoryError;
use super::value_objects::InvoiceStatus;

/// A persisted invoice as the store returns it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
  pub invoice_id: String,
  pub company_id: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub amount: i64,
  pub fee: i64,
  pub fee_rate: f64,
  pub tax: i64,
  pub tax_rate: f64,
  pub total: i64,
  pub status: InvoiceStatus,
}

/// Durable invoice storage.
///
/// Implementations must abort promptly when the returned future is dropped,
/// so a disconnected client never keeps a store call alive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  /// Rows for `company_id` due between the store's current date and
  /// `due_date_horizon` (inclusive), skipping paid ones.
  ///
  /// Order is stable for an unchanged dataset. A single undecodable row fails
  /// the whole read.
  async fn find_invoices(
    &self,
    company_id: &str,
    due_date_horizon: NaiveDate,
  ) -> Result<Vec<StoredRow>, RepositoryError>;

  /// Persists `invoice` atomically. The returned row carries the
  /// store-assigned identifier and is authoritative for every field.
  async fn insert_invoice(&self, invoice: &Invoice) -> Result<StoredRow, RepositoryError>;
}

use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::invoice::{Invoice, InvoiceError, InvoiceRepository};

#[derive(Debug, Clone)]
pub struct ListInvoicesCommand {
  pub company_id: String,
  /// Inclusive upper bound on the due date
  pub due_date: NaiveDate,
}

/// Lists a company's unpaid invoices due from today up to a horizon
pub struct ListInvoicesUseCase {
  invoice_repo: Arc<dyn InvoiceRepository>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_repo: Arc<dyn InvoiceRepository>) -> Self {
    Self { invoice_repo }
  }

  /// Stored values are trusted as-is; nothing is recomputed. An empty result
  /// is `Ok(vec![])`, never an error.
  pub async fn execute(&self, command: ListInvoicesCommand) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = self
      .invoice_repo
      .find_invoices(&command.company_id, command.due_date)
      .await
      .map_err(InvoiceError::Find)?;

    Ok(rows.into_iter().map(Invoice::from).collect())
  }
}

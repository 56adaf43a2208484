use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::invoice::{Invoice, InvoiceError, InvoiceRepository};

#[derive(Debug, Clone)]
pub struct CreateInvoiceCommand {
  pub company_id: String,
  pub issue_date: NaiveDate,
  pub amount: i64,
  pub due_date: NaiveDate,
  pub status: String,
}

pub struct CreateInvoiceUseCase {
  invoice_repo: Arc<dyn InvoiceRepository>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_repo: Arc<dyn InvoiceRepository>) -> Self {
    Self { invoice_repo }
  }

  /// Computes fee, tax and total, persists the invoice and returns it as stored.
  ///
  /// The stored row wins over the locally computed invoice, including the
  /// identifier and the total.
  pub async fn execute(&self, command: CreateInvoiceCommand) -> Result<Invoice, InvoiceError> {
    let invoice = Invoice::compute(
      command.company_id,
      command.issue_date,
      command.due_date,
      command.amount,
      &command.status,
    )?;

    let row = self
      .invoice_repo
      .insert_invoice(&invoice)
      .await
      .map_err(InvoiceError::Insert)?;

    Ok(Invoice::from(row))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{
    InvoiceStatus, RepositoryError, StoredRow, ValueObjectError, ports::MockInvoiceRepository,
  };
  use std::error::Error as _;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn command(status: &str) -> CreateInvoiceCommand {
    CreateInvoiceCommand {
      company_id: "1".to_string(),
      issue_date: date(1970, 1, 1),
      amount: 10000,
      due_date: date(2024, 10, 30),
      status: status.to_string(),
    }
  }

  fn row_for(invoice: &Invoice, invoice_id: &str) -> StoredRow {
    StoredRow {
      invoice_id: invoice_id.to_string(),
      company_id: invoice.company_id.clone(),
      issue_date: invoice.issue_date,
      due_date: invoice.due_date,
      amount: invoice.amount,
      fee: invoice.fee,
      fee_rate: invoice.fee_rate,
      tax: invoice.tax,
      tax_rate: invoice.tax_rate,
      total: invoice.total,
      status: invoice.status,
    }
  }

  #[tokio::test]
  async fn test_create_invoice_persists_computed_invoice() {
    let mut repo = MockInvoiceRepository::new();
    repo
      .expect_insert_invoice()
      .withf(|invoice| {
        invoice.id.is_none()
          && invoice.company_id == "1"
          && invoice.issue_date == NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
          && invoice.due_date == NaiveDate::from_ymd_opt(2024, 10, 30).unwrap()
          && invoice.amount == 10000
          && invoice.fee == 400
          && invoice.fee_rate == 0.04
          && invoice.tax == 40
          && invoice.tax_rate == 0.10
          && invoice.total == 10440
          && invoice.status == InvoiceStatus::Unprocessed
      })
      .times(1)
      .returning(|invoice| Ok(row_for(invoice, "1")));

    let use_case = CreateInvoiceUseCase::new(Arc::new(repo));
    let invoice = use_case.execute(command("unprocessed")).await.unwrap();

    assert_eq!(invoice.id.as_deref(), Some("1"));
    assert_eq!(invoice.amount, 10000);
    assert_eq!(invoice.fee, 400);
    assert_eq!(invoice.tax, 40);
    assert_eq!(invoice.total, 10440);
    assert_eq!(invoice.status, InvoiceStatus::Unprocessed);
  }

  #[tokio::test]
  async fn test_create_invoice_trusts_stored_row() {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_insert_invoice().returning(|invoice| {
      let mut row = row_for(invoice, "987");
      row.total = 99999;
      Ok(row)
    });

    let use_case = CreateInvoiceUseCase::new(Arc::new(repo));
    let invoice = use_case.execute(command("processing")).await.unwrap();

    assert_eq!(invoice.id.as_deref(), Some("987"));
    assert_eq!(invoice.total, 99999);
    assert_eq!(invoice.status, InvoiceStatus::Processing);
  }

  #[tokio::test]
  async fn test_create_invoice_rejects_invalid_status_before_store() {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_insert_invoice().never();

    let use_case = CreateInvoiceUseCase::new(Arc::new(repo));
    let err = use_case.execute(command("UNKNOWN")).await.unwrap_err();

    assert!(err.is_validation());
    assert!(matches!(
      err,
      InvoiceError::Validation(ValueObjectError::InvalidStatus(ref s)) if s == "UNKNOWN"
    ));
  }

  #[tokio::test]
  async fn test_create_invoice_wraps_repository_error() {
    let mut repo = MockInvoiceRepository::new();
    repo
      .expect_insert_invoice()
      .returning(|_| Err(RepositoryError::MissingInsertedRow));

    let use_case = CreateInvoiceUseCase::new(Arc::new(repo));
    let err = use_case.execute(command("unprocessed")).await.unwrap_err();

    assert!(matches!(
      err,
      InvoiceError::Insert(RepositoryError::MissingInsertedRow)
    ));
    assert_eq!(
      err.to_string(),
      "insert error: Store did not return the inserted row"
    );
    assert!(err.source().is_some());
  }
}

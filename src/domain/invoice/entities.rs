use chrono::NaiveDate;
use std::str::FromStr;

use super::errors::InvoiceError;
use super::ports::StoredRow;
use super::value_objects::{FEE_RATE, InvoiceStatus, TAX_RATE, ValueObjectError};

// Invoice - a company's charge with derived fee and tax
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
  /// Assigned by the store on insert; `None` until persisted
  pub id: Option<String>,
  pub company_id: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  /// Minor currency units
  pub amount: i64,
  pub fee: i64,
  pub fee_rate: f64,
  pub tax: i64,
  pub tax_rate: f64,
  pub total: i64,
  pub status: InvoiceStatus,
}

impl Invoice {
  /// Builds an unpersisted invoice, deriving fee, tax and total from `amount`.
  ///
  /// Fee and tax are truncated toward zero from the floating point product,
  /// e.g. an amount of 10000 yields fee 400, tax 40 and total 10440.
  ///
  /// # Errors
  ///
  /// Returns `InvoiceError::Validation` when `status` is not one of
  /// `unprocessed`, `processing`, `paid` or `error`, or when the total does
  /// not fit in an `i64`.
  pub fn compute(
    company_id: String,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    amount: i64,
    status: &str,
  ) -> Result<Self, InvoiceError> {
    let status = InvoiceStatus::from_str(status)?;
    let fee = truncate(amount as f64 * FEE_RATE);
    let tax = truncate(fee as f64 * TAX_RATE);
    let total = amount
      .checked_add(fee)
      .and_then(|sum| sum.checked_add(tax))
      .ok_or(ValueObjectError::AmountOutOfRange(amount))?;

    Ok(Self {
      id: None,
      company_id,
      issue_date,
      due_date,
      amount,
      fee,
      fee_rate: FEE_RATE,
      tax,
      tax_rate: TAX_RATE,
      total,
      status,
    })
  }

}

fn truncate(value: f64) -> i64 {
  value as i64
}

impl From<StoredRow> for Invoice {
  fn from(row: StoredRow) -> Self {
    Self {
      id: Some(row.invoice_id),
      company_id: row.company_id,
      issue_date: row.issue_date,
      due_date: row.due_date,
      amount: row.amount,
      fee: row.fee,
      fee_rate: row.fee_rate,
      tax: row.tax,
      tax_rate: row.tax_rate,
      total: row.total,
      status: row.status,
    }
  }
}

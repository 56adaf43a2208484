use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::domain::invoice::Invoice;

/// Query string of `GET /api/invoices`
#[derive(Debug, Clone, Default, Validate)]
pub struct ListInvoicesQuery {
  #[validate(length(min = 1, message = "'company_id' mustn't be empty"))]
  pub company_id: String,

  /// `YYYY-MM-DD`, inclusive upper bound on the due date
  pub due_date: String,
}

impl ListInvoicesQuery {
  /// Builds the query from decoded key/value pairs. A repeated key keeps its
  /// first value; unknown keys are ignored.
  pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
    let mut company_id = None;
    let mut due_date = None;

    for (key, value) in pairs {
      match key.as_str() {
        "company_id" if company_id.is_none() => company_id = Some(value),
        "due_date" if due_date.is_none() => due_date = Some(value),
        _ => {}
      }
    }

    Self {
      company_id: company_id.unwrap_or_default(),
      due_date: due_date.unwrap_or_default(),
    }
  }
}

// JSON `null` decodes like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /api/invoices`
///
/// Every field defaults, whether missing or `null`, so that a missing value
/// is reported by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
  #[serde(default, deserialize_with = "null_as_default")]
  #[validate(length(min = 1, message = "'company_id' mustn't be empty"))]
  pub company_id: String,

  #[serde(default, deserialize_with = "null_as_default")]
  pub issue_date: String,

  /// Minor currency units
  #[serde(default, deserialize_with = "null_as_default")]
  pub amount: i64,

  #[serde(default, deserialize_with = "null_as_default")]
  pub due_date: String,

  #[serde(default, deserialize_with = "null_as_default")]
  pub status: String,
}

/// Invoice as returned by both endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceResponse {
  pub issue_date: DateTime<Utc>,
  pub amount: i64,
  pub fee: i64,
  pub fee_rate: f64,
  pub tax: i64,
  pub tax_rate: f64,
  pub total: i64,
  pub due_date: DateTime<Utc>,
  pub status: String,
}

impl From<Invoice> for InvoiceResponse {
  fn from(invoice: Invoice) -> Self {
    Self {
      issue_date: midnight_utc(invoice.issue_date),
      amount: invoice.amount,
      fee: invoice.fee,
      fee_rate: invoice.fee_rate,
      tax: invoice.tax,
      tax_rate: invoice.tax_rate,
      total: invoice.total,
      due_date: midnight_utc(invoice.due_date),
      status: invoice.status.as_str().to_string(),
    }
  }
}

// Calendar dates go out as RFC 3339 timestamps at 00:00 UTC
fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
  date.and_time(NaiveTime::MIN).and_utc()
}

#[derive(Debug, Clone, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceResponse>,
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  pub message: String,
}

impl ErrorResponse {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

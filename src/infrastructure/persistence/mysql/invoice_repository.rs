use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::invoice::{
  Invoice, InvoiceStatus, RepositoryError, StoredRow, ports::InvoiceRepository,
};

/// Calendar dates cross the store boundary as text in this format
const DATE_FORMAT: &str = "%Y-%m-%d";

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, FromRow)]
struct InvoiceRow {
  invoice_id: i64,
  company_id: String,
  issue_date: String,
  amount: i64,
  fee: i64,
  fee_rate: f64,
  tax: i64,
  tax_rate: f64,
  total: i64,
  due_date: String,
  status: String,
}

impl TryFrom<InvoiceRow> for StoredRow {
  type Error = RepositoryError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    let issue_date = parse_date("issue_date", row.issue_date)?;
    let due_date = parse_date("due_date", row.due_date)?;
    let status = InvoiceStatus::from_str(&row.status).map_err(RepositoryError::InvalidStatus)?;

    Ok(StoredRow {
      invoice_id: row.invoice_id.to_string(),
      company_id: row.company_id,
      issue_date,
      due_date,
      amount: row.amount,
      fee: row.fee,
      fee_rate: row.fee_rate,
      tax: row.tax,
      tax_rate: row.tax_rate,
      total: row.total,
      status,
    })
  }
}

fn parse_date(column: &'static str, value: String) -> Result<NaiveDate, RepositoryError> {
  NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|source| RepositoryError::InvalidDate {
    column,
    value,
    source,
  })
}

fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

/// Runs a store call under `limit`. On expiry the call's future is dropped,
/// which releases its connection and abandons the query.
async fn bounded<T, F>(limit: Duration, operation: F) -> Result<T, RepositoryError>
where
  F: Future<Output = Result<T, RepositoryError>>,
{
  tokio::time::timeout(limit, operation)
    .await
    .map_err(|_| RepositoryError::Timeout(limit.as_secs()))?
}

pub struct MySqlInvoiceRepository {
  pool: MySqlPool,
  query_timeout: Duration,
}

impl MySqlInvoiceRepository {
  pub fn new(pool: MySqlPool) -> Self {
    Self {
      pool,
      query_timeout: DEFAULT_QUERY_TIMEOUT,
    }
  }

  pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
    self.query_timeout = query_timeout;
    self
  }

  async fn select_invoices(
    &self,
    company_id: &str,
    due_date_horizon: NaiveDate,
  ) -> Result<Vec<StoredRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT invoice_id, company_id, DATE_FORMAT(issue_date, '%Y-%m-%d') AS issue_date,
                   amount, fee, fee_rate, tax, tax_rate, total,
                   DATE_FORMAT(due_date, '%Y-%m-%d') AS due_date, status
            FROM invoice
            WHERE company_id = ? AND due_date BETWEEN UTC_DATE() AND ? AND status <> ?
            ORDER BY invoice_id
            "#,
    )
    .bind(company_id)
    .bind(format_date(due_date_horizon))
    .bind(InvoiceStatus::Paid.as_str())
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(StoredRow::try_from).collect()
  }

  async fn insert_in_transaction(&self, invoice: &Invoice) -> Result<StoredRow, RepositoryError> {
    // Dropping an uncommitted transaction rolls it back, which covers every
    // early return below as well as a failed commit.
    let mut tx = self.pool.begin().await?;

    let result = sqlx::query(
      r#"
            INSERT INTO invoice (
                company_id, issue_date, amount, fee, fee_rate,
                tax, tax_rate, total, due_date, status
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
    )
    .bind(invoice.company_id.as_str())
    .bind(format_date(invoice.issue_date))
    .bind(invoice.amount)
    .bind(invoice.fee)
    .bind(invoice.fee_rate)
    .bind(invoice.tax)
    .bind(invoice.tax_rate)
    .bind(invoice.total)
    .bind(format_date(invoice.due_date))
    .bind(invoice.status.as_str())
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT invoice_id, company_id, DATE_FORMAT(issue_date, '%Y-%m-%d') AS issue_date,
                   amount, fee, fee_rate, tax, tax_rate, total,
                   DATE_FORMAT(due_date, '%Y-%m-%d') AS due_date, status
            FROM invoice
            WHERE invoice_id = ?
            "#,
    )
    .bind(result.last_insert_id())
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(RepositoryError::MissingInsertedRow)?;

    let stored = StoredRow::try_from(row)?;
    tx.commit().await?;

    Ok(stored)
  }
}

#[async_trait]
impl InvoiceRepository for MySqlInvoiceRepository {
  async fn find_invoices(
    &self,
    company_id: &str,
    due_date_horizon: NaiveDate,
  ) -> Result<Vec<StoredRow>, RepositoryError> {
    bounded(
      self.query_timeout,
      self.select_invoices(company_id, due_date_horizon),
    )
    .await
  }

  async fn insert_invoice(&self, invoice: &Invoice) -> Result<StoredRow, RepositoryError> {
    bounded(self.query_timeout, self.insert_in_transaction(invoice)).await
  }
}

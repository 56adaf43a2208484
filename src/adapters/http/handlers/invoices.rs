use actix_web::{HttpRequest, HttpResponse, web};
use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

use super::request_id;
use crate::adapters::http::{
  dtos::{CreateInvoiceRequest, InvoiceResponse, ListInvoicesQuery, ListInvoicesResponse},
  errors::ApiError,
};
use crate::application::invoice::{
  CreateInvoiceCommand, CreateInvoiceUseCase, ListInvoicesCommand, ListInvoicesUseCase,
};
use crate::domain::invoice::InvoiceStatus;

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// chrono alone accepts unpadded months and days, so the shape is checked
/// first.
fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
  let bytes = value.as_bytes();
  let shaped = bytes.len() == 10
    && bytes[4] == b'-'
    && bytes[7] == b'-'
    && bytes
      .iter()
      .enumerate()
      .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

  if !shaped {
    return None;
  }

  NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Handler for listing unpaid invoices
///
/// GET /api/invoices?company_id=<id>&due_date=<YYYY-MM-DD>
/// Response: ListInvoicesResponse (JSON) with status 200
pub async fn list_invoices_handler(
  pairs: web::Query<Vec<(String, String)>>,
  use_case: web::Data<Arc<ListInvoicesUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let query = ListInvoicesQuery::from_pairs(pairs.into_inner());
  query.validate()?;

  let due_date = parse_calendar_date(&query.due_date).ok_or_else(|| {
    tracing::error!(
      request_id = %request_id(&http_req),
      due_date = %query.due_date,
      "Failed to convert duedate parameter to date"
    );
    ApiError::Validation("Can't convert duedate parameter to date".to_string())
  })?;

  let command = ListInvoicesCommand {
    company_id: query.company_id.clone(),
    due_date,
  };

  let invoices = use_case.execute(command).await.map_err(|err| {
    tracing::error!(
      request_id = %request_id(&http_req),
      company_id = %query.company_id,
      %due_date,
      error = %err,
      "Failed to find invoices"
    );
    ApiError::Internal("Failed to find invoices".to_string())
  })?;

  Ok(HttpResponse::Ok().json(ListInvoicesResponse {
    invoices: invoices.into_iter().map(InvoiceResponse::from).collect(),
  }))
}

/// Handler for issuing an invoice
///
/// POST /api/invoices
/// Body: CreateInvoiceRequest (JSON)
/// Response: InvoiceResponse (JSON) with status 200
pub async fn create_invoice_handler(
  request: web::Json<CreateInvoiceRequest>,
  use_case: web::Data<Arc<CreateInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let request = request.into_inner();
  request.validate()?;

  let issue_date = parse_calendar_date(&request.issue_date).ok_or_else(|| {
    tracing::error!(
      request_id = %request_id(&http_req),
      issue_date = %request.issue_date,
      "Failed to decode issue_date as YYYY-MM-DD"
    );
    ApiError::Validation("Failed to decode issue_date as YYYY-MM-DD".to_string())
  })?;

  let due_date = parse_calendar_date(&request.due_date).ok_or_else(|| {
    tracing::error!(
      request_id = %request_id(&http_req),
      due_date = %request.due_date,
      "Failed to decode due_date as YYYY-MM-DD"
    );
    ApiError::Validation("Failed to decode due_date as YYYY-MM-DD".to_string())
  })?;

  InvoiceStatus::from_str(&request.status).map_err(|err| ApiError::Validation(err.to_string()))?;

  let command = CreateInvoiceCommand {
    company_id: request.company_id.clone(),
    issue_date,
    amount: request.amount,
    due_date,
    status: request.status.clone(),
  };

  let invoice = use_case.execute(command).await.map_err(|err| {
    if err.is_validation() {
      return ApiError::Validation(err.to_string());
    }

    tracing::error!(
      request_id = %request_id(&http_req),
      company_id = %request.company_id,
      %issue_date,
      amount = request.amount,
      %due_date,
      status = %request.status,
      error = %err,
      "Failed to create invoice"
    );
    ApiError::Internal("Failed to create invoice".to_string())
  })?;

  Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

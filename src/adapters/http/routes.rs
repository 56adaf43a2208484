use actix_web::{HttpRequest, error, web};
use std::sync::Arc;

use crate::application::invoice::{CreateInvoiceUseCase, ListInvoicesUseCase};

use super::errors::ApiError;
use super::handlers::invoices::{create_invoice_handler, list_invoices_handler};
use super::handlers::request_id;

/// Configure invoice routes
///
/// Mounts the invoice endpoints on the enclosing scope (e.g. /api/invoices).
///
/// # Routes
///
/// - GET  - List unpaid invoices of a company due up to a date
/// - POST - Issue a new invoice
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use invoicer::application::invoice::{CreateInvoiceUseCase, ListInvoicesUseCase};
/// # use invoicer::adapters::http::routes::configure_invoice_routes;
///
/// # fn example(
/// #   create_use_case: Arc<CreateInvoiceUseCase>,
/// #   list_use_case: Arc<ListInvoicesUseCase>,
/// # ) {
/// let app = App::new().service(
///   web::scope("/api/invoices")
///     .configure(|cfg| configure_invoice_routes(cfg, create_use_case, list_use_case)),
/// );
/// # }
/// ```
pub fn configure_invoice_routes(
  cfg: &mut web::ServiceConfig,
  create_invoice_use_case: Arc<CreateInvoiceUseCase>,
  list_invoices_use_case: Arc<ListInvoicesUseCase>,
) {
  cfg
    .app_data(web::Data::new(create_invoice_use_case))
    .app_data(web::Data::new(list_invoices_use_case))
    .app_data(json_config())
    .app_data(query_config())
    .service(
      web::resource("")
        .route(web::get().to(list_invoices_handler))
        .route(web::post().to(create_invoice_handler)),
    );
}

/// Bodies are decoded whatever their content type; every decode failure
/// becomes the same 400.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .content_type_required(false)
    .content_type(|_| true)
    .error_handler(|err: error::JsonPayloadError, req: &HttpRequest| {
      tracing::error!(
        request_id = %request_id(req),
        error = %err,
        "Failed to decode invoice request"
      );
      ApiError::Validation("Failed to decode invoice request".to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, req: &HttpRequest| {
    tracing::error!(
      request_id = %request_id(req),
      error = %err,
      "Failed to decode query string"
    );
    ApiError::Validation("Failed to decode query string".to_string()).into()
  })
}

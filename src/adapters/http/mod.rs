pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  CreateInvoiceRequest, ErrorResponse, InvoiceResponse, ListInvoicesQuery, ListInvoicesResponse,
};
pub use errors::ApiError;
pub use handlers::invoices::{create_invoice_handler, list_invoices_handler};
pub use middleware::{BasicAuthMiddleware, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::configure_invoice_routes;

pub mod invoices;

use crate::adapters::http::middleware::RequestIdExt;
use actix_web::HttpRequest;

/// Request id for log correlation, empty when the middleware is not mounted
pub fn request_id(req: &HttpRequest) -> String {
  req
    .request_id()
    .map(|id| id.to_string())
    .unwrap_or_default()
}

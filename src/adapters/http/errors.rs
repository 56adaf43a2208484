use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{
    StatusCode,
    header::{self, ContentType},
  },
};
use std::fmt;

use super::dtos::ErrorResponse;

/// API error type that maps failures to HTTP responses.
///
/// The carried string is the user-visible message; causes are logged by the
/// caller before conversion.
#[derive(Debug)]
pub enum ApiError {
  /// Caller input rejected (400 Bad Request)
  Validation(String),

  /// Missing or wrong basic auth credentials (401 Unauthorized)
  Unauthorized(String),

  /// Anything downstream of validation (500 Internal Server Error)
  Internal(String),
}

impl ApiError {
  pub fn message(&self) -> &str {
    match self {
      ApiError::Validation(msg) | ApiError::Unauthorized(msg) | ApiError::Internal(msg) => msg,
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Unauthorized(msg) => write!(f, "Authentication error: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let mut response = HttpResponse::build(self.status_code());
    response.content_type(ContentType::json());

    if let ApiError::Unauthorized(_) = self {
      response.insert_header((header::WWW_AUTHENTICATE, r#"Basic realm="invoices""#));
    }

    response.json(ErrorResponse::new(self.message()))
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    ApiError::Validation(messages.join(", "))
  }
}

use actix_web::{
  Error, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};
use subtle::ConstantTimeEq;

use crate::{adapters::http::errors::ApiError, infrastructure::config::BasicAuthConfig};

const MISSING_HEADER: &str = "Authorization Header doesn't exist";
const UNAUTHORIZED: &str = "Unauthorized";

#[derive(Debug)]
struct Credentials {
  username: String,
  password: String,
}

impl Credentials {
  fn matches(&self, username: &str, password: &str) -> bool {
    let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
    let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
    (user_ok & pass_ok).into()
  }
}

/// HTTP basic authentication against a single configured credential pair
///
/// A disabled middleware forwards every request untouched.
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// # use invoicer::adapters::http::middleware::BasicAuthMiddleware;
///
/// let app = App::new().service(
///   web::scope("/api/invoices")
///     .wrap(BasicAuthMiddleware::new("user", "secret"))
///     .route("", web::get().to(|| async { "invoices" })),
/// );
/// ```
#[derive(Clone)]
pub struct BasicAuthMiddleware {
  credentials: Option<Arc<Credentials>>,
}

impl BasicAuthMiddleware {
  pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      credentials: Some(Arc::new(Credentials {
        username: username.into(),
        password: password.into(),
      })),
    }
  }

  pub fn disabled() -> Self {
    Self { credentials: None }
  }

  pub fn from_config(config: &BasicAuthConfig) -> Self {
    if config.enabled {
      Self::new(config.username.clone(), config.password.clone())
    } else {
      Self::disabled()
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.credentials.is_some()
  }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = BasicAuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(BasicAuthMiddlewareService {
      service: Rc::new(service),
      credentials: self.credentials.clone(),
    }))
  }
}

pub struct BasicAuthMiddlewareService<S> {
  service: Rc<S>,
  credentials: Option<Arc<Credentials>>,
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let credentials = self.credentials.clone();

    Box::pin(async move {
      if let Some(credentials) = credentials {
        let rejection = match extract_basic_credentials(&req) {
          None => Some(ApiError::Unauthorized(MISSING_HEADER.to_string())),
          Some((username, password)) if !credentials.matches(&username, &password) => {
            tracing::warn!(path = %req.path(), "Rejected basic auth credentials");
            Some(ApiError::Unauthorized(UNAUTHORIZED.to_string()))
          }
          Some(_) => None,
        };

        if let Some(api_error) = rejection {
          let (request, _) = req.into_parts();
          let response = api_error.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      }

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Decodes `Authorization: Basic <base64(user:pass)>`
fn extract_basic_credentials(req: &ServiceRequest) -> Option<(String, String)> {
  let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, encoded) = value.trim().split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("basic") {
    return None;
  }

  let decoded = STANDARD.decode(encoded.trim()).ok()?;
  let decoded = String::from_utf8(decoded).ok()?;
  let (username, password) = decoded.split_once(':')?;
  Some((username.to_string(), password.to_string()))
}

use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicer::{
  adapters::http::{BasicAuthMiddleware, RequestIdMiddleware, configure_invoice_routes},
  application::invoice::{CreateInvoiceUseCase, ListInvoicesUseCase},
  domain::invoice::InvoiceRepository,
  infrastructure::{config::Config, persistence::mysql::MySqlInvoiceRepository},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoicer=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoicer");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let db = &config.database;
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(db.connect_timeout_seconds),
    MySqlPoolOptions::new()
      .max_connections(db.max_connections)
      .min_connections(db.min_connections)
      .max_lifetime(Duration::from_secs(db.max_lifetime_seconds))
      .idle_timeout(Duration::from_secs(db.idle_timeout_seconds))
      .acquire_timeout(Duration::from_secs(db.acquire_timeout_seconds))
      .connect(&db.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is MySQL running?",
      db.connect_timeout_seconds
    );
    anyhow::anyhow!(
      "Database connection timed out after {} seconds",
      db.connect_timeout_seconds
    )
  })?
  .context("Could not connect to database")?;

  tracing::info!(max_connections = db.max_connections, "Database connection pool created");

  if db.run_migrations {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations")
      .run(&db_pool)
      .await
      .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");
  }

  let invoice_repo: Arc<dyn InvoiceRepository> = Arc::new(
    MySqlInvoiceRepository::new(db_pool)
      .with_query_timeout(Duration::from_secs(db.query_timeout_seconds)),
  );

  let create_invoice_use_case = Arc::new(CreateInvoiceUseCase::new(invoice_repo.clone()));
  let list_invoices_use_case = Arc::new(ListInvoicesUseCase::new(invoice_repo));

  let basic_auth = BasicAuthMiddleware::from_config(&config.basic_auth);
  if basic_auth.is_enabled() {
    tracing::info!("Basic authentication enabled");
  } else {
    tracing::warn!("Basic authentication disabled");
  }

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .service(
        web::scope("/api/invoices")
          .wrap(basic_auth.clone())
          .configure(|cfg| {
            configure_invoice_routes(
              cfg,
              create_invoice_use_case.clone(),
              list_invoices_use_case.clone(),
            )
          }),
      )
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))
  .with_context(|| format!("Failed to bind {}:{}", server_host, server_port))?
  .run()
  .await
  .context("HTTP server terminated with an error")
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}

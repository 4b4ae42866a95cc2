use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, dev::Server, http, middleware::from_fn, web, web::Data};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_actix_web::TracingLogger;

use crate::acquirer::{Acquirer, bank_simulator::BankSimulatorClient};
use crate::authentication::require_api_key;
use crate::configuration::{CorsSettings, DatabaseSettings, Settings};
use crate::errors::recover_from_panics;
use crate::idempotency::{IdempotencyCache, MokaIdempotencyCache, attach_idempotency_key};
use crate::metrics::{RequestMetrics, install_recorder};
use crate::routes::{create_payment, get_payment, health_check, metrics_endpoint};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    #[allow(clippy::missing_errors_doc)]
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        ping_with_retries(&connection_pool, 3).await?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port,
        );

        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr().unwrap().port();

        let acquirer: Arc<dyn Acquirer> = Arc::new(BankSimulatorClient::new(
            configuration.acquirer.base_url,
            configuration.acquirer.api_key,
        ));
        let cache: Arc<dyn IdempotencyCache> =
            Arc::new(MokaIdempotencyCache::new(configuration.idempotency.ttl()));
        let metrics_handle = install_recorder();

        let server = run(
            listener,
            connection_pool,
            acquirer,
            cache,
            metrics_handle,
            configuration.cors,
        )?;

        Ok(Self { port, server })
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// §4.6: "Startup performs up to 3 pings with retry."
async fn ping_with_retries(pool: &PgPool, attempts: u32) -> Result<(), anyhow::Error> {
    let mut last_error = None;
    for attempt in 1..=attempts {
        match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => return Ok(()),
            Err(e) => {
                tracing::warn!(attempt, error = %e, "database ping failed");
                last_error = Some(e);
                tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
            }
        }
    }
    Err(last_error.expect("at least one attempt is always made").into())
}

#[allow(clippy::too_many_arguments)]
fn run(
    listener: TcpListener,
    db_pool: PgPool,
    acquirer: Arc<dyn Acquirer>,
    cache: Arc<dyn IdempotencyCache>,
    metrics_handle: PrometheusHandle,
    cors_config: CorsSettings,
) -> Result<Server, anyhow::Error> {
    let db_pool = Data::new(db_pool);
    let acquirer = Data::from(acquirer);
    let cache = Data::from(cache);
    let metrics_handle = Data::new(metrics_handle);

    let server = HttpServer::new(move || {
        let cors = {
            let mut cors = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors.allowed_methods(vec!["GET", "POST"])
                .allowed_headers(vec![
                    http::header::AUTHORIZATION,
                    http::header::ACCEPT,
                    http::header::CONTENT_TYPE,
                    http::header::HeaderName::from_static("x-idempotency-key"),
                ])
                .max_age(cors_config.max_age)
        };

        App::new()
            .wrap(from_fn(recover_from_panics))
            .wrap(TracingLogger::default())
            .wrap(RequestMetrics)
            .route("/health_check", web::get().to(health_check))
            .route("/metrics", web::get().to(metrics_endpoint))
            .service(
                web::scope("/api/payments")
                    .wrap(cors)
                    .wrap(from_fn(attach_idempotency_key))
                    .wrap(from_fn(require_api_key))
                    .route("", web::post().to(create_payment))
                    .route("/{id}", web::get().to(get_payment)),
            )
            .app_data(db_pool.clone())
            .app_data(acquirer.clone())
            .app_data(cache.clone())
            .app_data(metrics_handle.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

#[must_use]
pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.connect_options())
}

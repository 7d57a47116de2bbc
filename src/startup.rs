use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::repository::PgSubscriptionRepository;
use crate::routes::{
    handle_create_subscription, handle_delete_subscription, handle_get_subscription,
    handle_list_subscriptions, handle_subscriptions_cost, handle_update_subscription,
    health_check, json_resource,
};
use crate::service::SubscriptionService;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let service = SubscriptionService::new(Arc::new(PgSubscriptionRepository::new(db_pool)));

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();

        tracing::info!("Server listening on {}:{}", config.application.get_host(), port);

        let server = run(listener, service, config.get_shutdown_timeout())?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    service: SubscriptionService,
    shutdown_timeout_secs: u64,
) -> Result<Server, std::io::Error> {
    let service = web::Data::new(service);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .configure(configure_api)
            .app_data(service.clone())
    })
    .shutdown_timeout(shutdown_timeout_secs)
    .listen(listener)?
    .run();

    Ok(server)
}

/// Mounts the `/api/v1` subscription routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().content_type_required(false))
        .service(
            web::scope("/api/v1")
                .service(
                    json_resource("/subscriptions", "GET, POST, OPTIONS")
                        .route(web::get().to(handle_list_subscriptions))
                        .route(web::post().to(handle_create_subscription)),
                )
                // Registered before `{id}` so "cost" is not taken for an id.
                .service(
                    json_resource("/subscriptions/cost", "GET, OPTIONS")
                        .route(web::get().to(handle_subscriptions_cost)),
                )
                .service(
                    json_resource("/subscriptions/{id}", "GET, PUT, DELETE, OPTIONS")
                        .route(web::get().to(handle_get_subscription))
                        .route(web::put().to(handle_update_subscription))
                        .route(web::delete().to(handle_delete_subscription)),
                ),
        );
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}

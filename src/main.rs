use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::net::TcpListener;

mod config;
mod db;
mod error;
mod handlers;
mod routes;
mod services;
mod stripe_types;

use crate::config::AppSettings;
use crate::db::connection::{create_pool, verify_connection};
use crate::routes::{configure_health_routes, configure_webhook_routes};
use crate::services::StripeService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Load application settings
    let app_settings = match AppSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load application settings: {}", e);
            log::error!("Cannot start server without valid settings");
            std::process::exit(1);
        }
    };

    // Database connection setup
    let db_pool = match create_pool(&app_settings.database.url).await {
        Ok(pool) => {
            if let Err(e) = verify_connection(&pool).await {
                log::error!("Database connection verification failed: {}", e);
                log::error!("Cannot start server without a working database connection");
                std::process::exit(1);
            }
            pool
        }
        Err(e) => {
            log::error!("Failed to create database connection pool: {}", e);
            log::error!("Cannot start server without a working database connection");
            std::process::exit(1);
        }
    };

    // The Stripe client is constructed once and injected into handlers, so
    // tests can substitute one pointed at a mock server.
    let stripe_service = StripeService::new(
        app_settings.stripe.secret_key.clone(),
        app_settings.stripe.webhook_secret.clone(),
    );

    let host = &app_settings.server.host;
    let port = app_settings.server.port;
    log::info!(
        "Starting {} at http://{}:{}",
        app_settings.app.name,
        host,
        port
    );

    let listener = TcpListener::bind(format!("{}:{}", host, port))?;

    HttpServer::new(move || {
        let app_settings = app_settings.clone();

        // Stripe calls the webhook server-to-server; CORS only matters for
        // the preflight contract on the webhook route.
        let mut cors = Cors::default();
        if app_settings.server.cors_origins.contains(&"*".to_string()) {
            cors = cors.allow_any_origin();
        } else {
            for origin in &app_settings.server.cors_origins {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allowed_methods(vec!["POST", "OPTIONS"])
            .allowed_headers(vec!["stripe-signature", "content-type"]);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(app_settings))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(stripe_service.clone()))
            .configure(configure_health_routes)
            .configure(configure_webhook_routes)
    })
    .listen(listener)?
    .run()
    .await
}

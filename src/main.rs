use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use rental_match::config::Settings;
use rental_match::core::Matcher;
use rental_match::routes::{self, search::AppState};
use rental_match::services::{BackendClient, BackendTables, PoolCache};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Rental Match search service...");

    let tables = BackendTables {
        properties: settings.backend.properties_table.clone(),
        preferences: settings.backend.preferences_table.clone(),
        image_bucket: settings.backend.image_bucket.clone(),
    };

    let backend = BackendClient::new(
        settings.backend.url.clone(),
        settings.backend.api_key.clone(),
        tables,
        Duration::from_secs(settings.backend.timeout_secs.unwrap_or(30)),
    )
    .map_err(|e| {
        error!("Failed to create backend client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Backend client initialized for {}", settings.backend.url);

    let cache = PoolCache::new(settings.cache.max_entries, settings.cache.ttl_secs);

    info!("Pool cache initialized (TTL: {}s)", settings.cache.ttl_secs);

    let policy = settings.matching.radius_policy();
    let matcher = Matcher::new(policy.clone());

    info!("Matcher initialized with radius policy: {:?}", policy);

    let app_state = AppState {
        backend: Arc::new(backend),
        cache: Arc::new(cache),
        matcher,
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use pitchflic_deck::config::Settings;
use pitchflic_deck::core::StaticCandidates;
use pitchflic_deck::routes::{self, AppState};
use pitchflic_deck::services::{BackendClient, SessionStore, SwipeLedger, TokenVerifier};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging; LOG_LEVEL / LOG_FORMAT override the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting PitchFlic deck service...");

    // Initialize backend client
    let backend = match BackendClient::new(&settings.backend) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create backend client: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    info!("Backend client initialized for {}", settings.backend.url);

    let tokens = TokenVerifier::new(&settings.backend.jwt_secret, &settings.backend.jwt_audience);

    // Initialize the swipe ledger (optional - decks work without it)
    let (ledger, ledger_tx) = match &settings.database.url {
        Some(url) => {
            let ledger = SwipeLedger::from_settings(
                url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            let ledger = Arc::new(ledger);
            let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
            ledger.clone().spawn_recorder(rx);

            info!("Swipe ledger initialized");
            (Some(ledger), Some(tx))
        }
        None => {
            warn!("No database configured, swipes will not be persisted");
            (None, None)
        }
    };

    // Candidate fixture (optional - profiles come from the backend otherwise)
    let fixture = match &settings.deck.candidates_file {
        Some(path) => match StaticCandidates::from_toml_file(path) {
            Ok(source) => Some(source),
            Err(e) => {
                error!("Failed to load candidates from {}: {}", path, e);
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
            }
        },
        None => None,
    };

    let sessions = SessionStore::new(settings.deck.max_sessions, settings.deck.session_ttl_secs);

    info!(
        "Session store initialized (max: {}, idle TTL: {}s)",
        settings.deck.max_sessions, settings.deck.session_ttl_secs
    );

    let deck_settings = settings.swipe.deck_settings();
    info!("Swipe tunables: {:?}", deck_settings);

    // Build application state
    let app_state = AppState {
        sessions,
        backend,
        tokens,
        ledger,
        ledger_tx,
        fixture,
        deck: settings.deck.clone(),
        deck_settings,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(routes::handle_path_error))
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

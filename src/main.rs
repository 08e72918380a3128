use aiverse_portal::auth::{IdentityContext, PgUserStore};
use aiverse_portal::campus::MapViewController;
use aiverse_portal::chat::SessionManager;
use aiverse_portal::config::PortalConfig;
use aiverse_portal::error::PortalError;
use aiverse_portal::events::{EventsController, PgEventStore};
use aiverse_portal::gemini_client::GeminiClient;
use aiverse_portal::{build_router, db, AppState};
use std::net::SocketAddr;
use std::sync::Arc;

const REAPER_INTERVAL_SECS: u64 = 300;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run().await {
        tracing::error!("❌ Portal stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PortalError> {
    let config = PortalConfig::from_env()?;

    let db_pool = db::create_pool(&config.database_url).await?;
    tracing::info!("✅ Database connection pool ready");

    let chat = match &config.gemini_api_key {
        Some(api_key) => {
            tracing::info!("Initializing Gemini client ({})...", config.gemini_model);
            let client = GeminiClient::new(api_key.clone(), config.gemini_model.clone());
            Some(SessionManager::new(Arc::new(client)))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not found. The campus assistant will be disabled.");
            None
        }
    };

    if config.google_maps_api_key.is_none() {
        tracing::warn!("GOOGLE_MAPS_API_KEY not found. The campus map will show as unavailable.");
        tracing::info!("To enable the map, set: GOOGLE_MAPS_API_KEY");
    }

    let shared_state = Arc::new(AppState {
        identity: IdentityContext::new(config.jwt_secret.clone()),
        users: Arc::new(PgUserStore::new(db_pool.clone())),
        map: MapViewController::new(config.google_maps_api_key.clone()),
        events: EventsController::new(Arc::new(PgEventStore::new(db_pool.clone()))),
        chat,
        db_pool,
        config,
    });

    let app = build_router(shared_state.clone());

    if shared_state.chat.is_some() {
        let reaper_state = shared_state.clone();
        let max_idle = chrono::Duration::minutes(shared_state.config.chat_session_idle_minutes);
        tokio::spawn(async move {
            tracing::info!(
                "🧹 Reaping chat sessions idle for more than {} minutes",
                max_idle.num_minutes()
            );
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(REAPER_INTERVAL_SECS)).await;
                if let Some(manager) = reaper_state.chat.as_ref() {
                    manager.reap_idle(max_idle).await;
                }
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(&shared_state.config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

fn init_logging() -> Result<(), PortalError> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,aiverse_portal=trace,sqlx=info,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,aiverse_portal=info,sqlx=warn,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .map_err(|e| PortalError::Logging(e.to_string()))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| PortalError::Logging(e.to_string()))?;

    tracing::info!("🎓 AIverse portal starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Build mode: {}", if cfg!(debug_assertions) { "development" } else { "production" });
    tracing::info!("Log level: {}", log_level);

    let flag = |name: &str| {
        if std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false) {
            "✅"
        } else {
            "❌"
        }
    };
    tracing::info!(
        "Configuration - Database: {}, Gemini AI: {}, Google Maps: {}",
        flag("DATABASE_URL"),
        flag("GEMINI_API_KEY"),
        flag("GOOGLE_MAPS_API_KEY")
    );

    Ok(())
}

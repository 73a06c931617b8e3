use actix_web::{middleware as actix_middleware, App, HttpServer};
use anyhow::Context;
use tokio::time;

use webmvc::app::{self, AppState};
use webmvc::config::AppConfig;
use webmvc::pipeline::boundary;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting web server...");

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "server/config/app.toml".to_string());
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration from '{}'", config_path))?;

    log::info!(
        "Session timeout {}s, cookie '{}'",
        config.session.max_inactive_secs,
        config.session.cookie_name
    );

    let cleanup_interval = config.cleanup_interval();
    let (host, port) = (config.server.host.clone(), config.server.port);

    let state = AppState::from_config(config).context("Failed to initialise application state")?;
    state.seed().context("Failed to seed demo data")?;

    let dispatcher = app::dispatcher_data(&state);

    // Spawn background cleanup task
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired();
            if removed > 0 {
                log::info!("Background cleanup: removed {} expired sessions", removed);
            }
        }
    });

    log::info!("Starting HTTP server at {}:{}...", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_middleware::Logger::default())
            .configure(boundary::configure(dispatcher.clone()))
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}

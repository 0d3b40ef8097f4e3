use server::{Key, SessionConfig};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "event_planner={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    let key = match server.session_key()? {
        Some(key) => key,
        None => {
            tracing::warn!("no secret_key configured, sessions will not survive a restart");
            Key::generate()
        }
    };
    let session_config = SessionConfig {
        key,
        secure: server.secure_cookies,
    };

    let db = parse_database(&server.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await?;

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, session_config, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    migration::ensure_schema(&database).await?;
    tracing::info!("database ready");
    Ok(database)
}

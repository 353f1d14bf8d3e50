use color_eyre::eyre::Result;
use dotenv::dotenv;
use coachsync_api::config::DatabaseConfig;
use coachsync_db::schema::initialize_database;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = DatabaseConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Connecting to database...");
    let db_pool = coachsync_db::create_pool(&config.database_url).await?;

    initialize_database(&db_pool).await?;

    Ok(())
}

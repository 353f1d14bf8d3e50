use color_eyre::eyre::Result;
use dotenv::dotenv;
use coachsync_api::config::DatabaseConfig;
use coachsync_core::{
    models::person::{NewPerson, Role},
    store::SlotStore,
};
use coachsync_db::{create_pool, schema::initialize_database, PgSlotStore};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

const SAMPLE_PERSONS: &[(&str, &str, Role)] = &[
    ("Bryan Cranston", "123-456-7890", Role::Coach),
    ("Aaron Paul", "987-654-3210", Role::Student),
    ("Dean Norris", "555-666-7777", Role::Coach),
    ("RJ Mitte", "222-333-4444", Role::Student),
    ("Anna Gunn", "555-666-7777", Role::Coach),
    ("Betsy Brandt", "222-333-4444", Role::Student),
];

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

    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    let store = PgSlotStore::new(db_pool);
    if !store.list_persons().await?.is_empty() {
        info!("Persons already present, skipping seed");
        return Ok(());
    }

    for (name, phone_number, role) in SAMPLE_PERSONS {
        let person = store
            .create_person(NewPerson {
                name: name.to_string(),
                phone_number: phone_number.to_string(),
                role: *role,
            })
            .await?;
        info!("Added {} {} (id {})", person.role, person.name, person.id);
    }

    info!("Sample persons added");
    Ok(())
}

use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create persons table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS persons (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            phone_number VARCHAR(20) NOT NULL,
            role VARCHAR(10) NOT NULL,
            CONSTRAINT valid_role CHECK (role IN ('coach', 'student'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id SERIAL PRIMARY KEY,
            coach_id INTEGER NOT NULL REFERENCES persons(id),
            date DATE NOT NULL,
            time_start TIME NOT NULL,
            time_end TIME NOT NULL,
            booked_by INTEGER NULL REFERENCES persons(id),
            rating INTEGER NULL,
            notes TEXT NULL,
            CONSTRAINT valid_time_range CHECK (time_end > time_start),
            CONSTRAINT valid_rating CHECK (rating IS NULL OR rating BETWEEN 1 AND 5)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_slots_coach_id ON slots(coach_id)",
        "CREATE INDEX IF NOT EXISTS idx_slots_booked_by ON slots(booked_by)",
        "CREATE INDEX IF NOT EXISTS idx_slots_date ON slots(date)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}

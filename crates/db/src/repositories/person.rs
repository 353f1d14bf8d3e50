use crate::models::DbPerson;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_person(
    pool: &Pool<Postgres>,
    name: &str,
    phone_number: &str,
    role: &str,
) -> Result<DbPerson> {
    tracing::debug!("Creating person: name={}, role={}", name, role);

    let person = sqlx::query_as::<_, DbPerson>(
        r#"
        INSERT INTO persons (name, phone_number, role)
        VALUES ($1, $2, $3)
        RETURNING id, name, phone_number, role
        "#,
    )
    .bind(name)
    .bind(phone_number)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(person)
}

pub async fn list_persons(pool: &Pool<Postgres>) -> Result<Vec<DbPerson>> {
    let persons = sqlx::query_as::<_, DbPerson>(
        r#"
        SELECT id, name, phone_number, role
        FROM persons
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(persons)
}

pub async fn get_persons_by_ids(pool: &Pool<Postgres>, ids: &[i32]) -> Result<Vec<DbPerson>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let persons = sqlx::query_as::<_, DbPerson>(
        r#"
        SELECT id, name, phone_number, role
        FROM persons
        WHERE id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(persons)
}

use crate::models::DbSlot;
use chrono::{NaiveDate, NaiveTime};
use coachsync_core::models::slot::{BookingScope, SlotFilter};
use eyre::Result;
use sqlx::{Pool, Postgres, QueryBuilder};

const SLOT_COLUMNS: &str = "id, coach_id, date, time_start, time_end, booked_by, rating, notes";

pub async fn create_slot(
    pool: &Pool<Postgres>,
    coach_id: i32,
    date: NaiveDate,
    time_start: NaiveTime,
    time_end: NaiveTime,
) -> Result<DbSlot> {
    tracing::debug!(
        "Creating slot: coach_id={}, date={}, {}-{}",
        coach_id, date, time_start, time_end
    );

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO slots (coach_id, date, time_start, time_end)
        VALUES ($1, $2, $3, $4)
        RETURNING id, coach_id, date, time_start, time_end, booked_by, rating, notes
        "#,
    )
    .bind(coach_id)
    .bind(date)
    .bind(time_start)
    .bind(time_end)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: i32) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, coach_id, date, time_start, time_end, booked_by, rating, notes
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Builds the `SELECT` for a listing filter. Kept separate so the generated SQL
/// can be checked without a database.
pub fn filter_query(filter: &SlotFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {} FROM slots WHERE TRUE", SLOT_COLUMNS));

    if let Some(coach_id) = filter.coach_id {
        query.push(" AND coach_id = ").push_bind(coach_id);
    }

    match filter.booking {
        BookingScope::Any => {}
        BookingScope::BookedBy(student_id) => {
            query.push(" AND booked_by = ").push_bind(student_id);
        }
        BookingScope::AvailableOrBookedBy(student_id) => {
            query
                .push(" AND (booked_by IS NULL OR booked_by = ")
                .push_bind(student_id)
                .push(")");
        }
    }

    if let Some(today) = filter.not_before {
        query.push(" AND date >= ").push_bind(today);
    }

    query.push(" ORDER BY date ASC, time_start ASC, id ASC");
    query
}

pub async fn find_slots(pool: &Pool<Postgres>, filter: &SlotFilter) -> Result<Vec<DbSlot>> {
    let mut query = filter_query(filter);
    tracing::debug!("Finding slots: {}", query.sql());

    let slots = query.build_query_as::<DbSlot>().fetch_all(pool).await?;

    Ok(slots)
}

pub async fn find_booked_slots_involving(
    pool: &Pool<Postgres>,
    coach_id: Option<i32>,
    student_id: i32,
) -> Result<Vec<DbSlot>> {
    // A NULL coach_id never matches, leaving only the student's bookings.
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, coach_id, date, time_start, time_end, booked_by, rating, notes
        FROM slots
        WHERE (coach_id = $1 OR booked_by = $2)
          AND booked_by IS NOT NULL
        "#,
    )
    .bind(coach_id)
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn book_slot(
    pool: &Pool<Postgres>,
    id: i32,
    student_id: i32,
) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET booked_by = $2
        WHERE id = $1 AND booked_by IS NULL
        RETURNING id, coach_id, date, time_start, time_end, booked_by, rating, notes
        "#,
    )
    .bind(id)
    .bind(student_id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn update_feedback(
    pool: &Pool<Postgres>,
    id: i32,
    rating: i32,
    notes: Option<&str>,
) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE slots
        SET rating = $2, notes = $3
        WHERE id = $1
        RETURNING id, coach_id, date, time_start, time_end, booked_by, rating, notes
        "#,
    )
    .bind(id)
    .bind(rating)
    .bind(notes)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

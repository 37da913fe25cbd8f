mod models;

pub use models::*;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::certification::CertificationTier;

pub type DbPool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Arc::new(pool))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn list_offices(pool: &PgPool) -> Result<Vec<Office>, sqlx::Error> {
    sqlx::query_as::<_, Office>("SELECT * FROM offices ORDER BY office_name")
        .fetch_all(pool)
        .await
}

pub async fn get_office(pool: &PgPool, id: Uuid) -> Result<Option<Office>, sqlx::Error> {
    sqlx::query_as::<_, Office>("SELECT * FROM offices WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Inserts a record together with its derived values. The caller computes
/// (percent, tier) via `certification::evaluate`; the checklist and both
/// derived columns land in one statement.
pub async fn insert_office(
    pool: &PgPool,
    new: &NewOffice,
    percent: u8,
    tier: CertificationTier,
) -> Result<Office, sqlx::Error> {
    sqlx::query_as::<_, Office>(
        r#"
        INSERT INTO offices (office_name, department, contact_person, contact_email,
                             total_employees, checklist, completion_percent,
                             certification_tier, certificate_date, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&new.office_name)
    .bind(&new.department)
    .bind(&new.contact_person)
    .bind(&new.contact_email)
    .bind(new.total_employees)
    .bind(sqlx::types::Json(&new.checklist))
    .bind(percent as i32)
    .bind(tier.label())
    .bind(&new.certificate_date)
    .bind(&new.notes)
    .fetch_one(pool)
    .await
}

/// Full-row update from a merged draft, derived values included, in a single
/// statement so checklist data and score can never disagree.
pub async fn update_office(
    pool: &PgPool,
    id: Uuid,
    draft: &NewOffice,
    percent: u8,
    tier: CertificationTier,
) -> Result<Option<Office>, sqlx::Error> {
    sqlx::query_as::<_, Office>(
        r#"
        UPDATE offices
        SET office_name = $2, department = $3, contact_person = $4, contact_email = $5,
            total_employees = $6, checklist = $7, completion_percent = $8,
            certification_tier = $9, certificate_date = $10, notes = $11,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&draft.office_name)
    .bind(&draft.department)
    .bind(&draft.contact_person)
    .bind(&draft.contact_email)
    .bind(draft.total_employees)
    .bind(sqlx::types::Json(&draft.checklist))
    .bind(percent as i32)
    .bind(tier.label())
    .bind(&draft.certificate_date)
    .bind(&draft.notes)
    .fetch_optional(pool)
    .await
}

pub async fn delete_office(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM offices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

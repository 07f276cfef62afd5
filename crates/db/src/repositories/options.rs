use crate::models::DbOption;
use crate::repositories::Association;
use eyre::Result;
use sqlx::{Pool, Postgres};

async fn list_active(pool: &Pool<Postgres>, table: &str) -> Result<Vec<DbOption>> {
    tracing::debug!("Listing active options from {}", table);

    let options = sqlx::query_as::<_, DbOption>(&format!(
        r#"
        SELECT id, name
        FROM {table}
        WHERE is_active = TRUE
        ORDER BY name ASC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(options)
}

pub async fn list_active_services(pool: &Pool<Postgres>) -> Result<Vec<DbOption>> {
    list_active(pool, Association::Services.option_table()).await
}

pub async fn list_active_locations(pool: &Pool<Postgres>) -> Result<Vec<DbOption>> {
    list_active(pool, Association::Locations.option_table()).await
}

pub async fn list_active_companies(pool: &Pool<Postgres>) -> Result<Vec<DbOption>> {
    list_active(pool, Association::Companies.option_table()).await
}

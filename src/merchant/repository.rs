use sqlx::PgPool;
use uuid::Uuid;

/// Looks up the merchant bound to an api key. `Ok(None)` covers both "no
/// such key" and "key belongs to a deactivated merchant" — callers can't
/// tell the two apart, matching the original interceptor's behaviour.
#[tracing::instrument(name = "Look up merchant by api key", skip(pool))]
pub async fn get_id_by_api_key(pool: &PgPool, api_key: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query!(
        r#"SELECT id FROM merchants WHERE apikey = $1 AND active = true"#,
        api_key
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.id))
}

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use super::store::{not_found, Document, DocumentStore, Filter};
use crate::error::{AppError, AppResult};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled migrations (the `documents` table)
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Document store backed by a single JSONB table
///
/// Each primitive is one SQL statement, so array union/remove are atomic per
/// document even with concurrent writers.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds the JSONB containment object for equality filters
fn filter_object(filters: &[Filter<'_>]) -> Value {
    let object: Map<String, Value> = filters
        .iter()
        .map(|(field, value)| (field.to_string(), value.clone()))
        .collect();
    Value::Object(object)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let data: Option<Json<Value>> = sqlx::query_scalar(
            "SELECT data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(data.map(|Json(value)| value))
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> AppResult<()> {
        if !data.is_object() {
            return Err(AppError::InvalidInput(
                "Documents must be JSON objects".to_string(),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> AppResult<()> {
        if !fields.is_object() {
            return Err(AppError::InvalidInput(
                "Update fields must be a JSON object".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3::jsonb, updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(collection, id));
        }
        Ok(())
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = jsonb_set(
                    data,
                    ARRAY[$3],
                    CASE
                        WHEN data->$3 IS NULL OR jsonb_typeof(data->$3) <> 'array'
                            THEN jsonb_build_array($4::jsonb)
                        WHEN EXISTS (
                            SELECT 1 FROM jsonb_array_elements(data->$3) AS e(value)
                            WHERE e.value = $4::jsonb
                        )
                            THEN data->$3
                        ELSE (data->$3) || jsonb_build_array($4::jsonb)
                    END,
                    true),
                updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(Json(value))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(collection, id));
        }
        Ok(())
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE documents
            SET data = jsonb_set(
                    data,
                    ARRAY[$3],
                    COALESCE(
                        (SELECT jsonb_agg(e.value ORDER BY e.ord)
                         FROM jsonb_array_elements(data->$3) WITH ORDINALITY AS e(value, ord)
                         WHERE e.value <> $4::jsonb),
                        '[]'::jsonb)),
                updated_at = now()
            WHERE collection = $1 AND id = $2 AND jsonb_typeof(data->$3) = 'array'
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(Json(value))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query(&self, collection: &str, filters: &[Filter<'_>]) -> AppResult<Vec<Document>> {
        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            r#"
            SELECT id, data FROM documents
            WHERE collection = $1 AND data @> $2::jsonb
            ORDER BY id
            "#,
        )
        .bind(collection)
        .bind(Json(filter_object(filters)))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(data))| Document { id, data })
            .collect())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

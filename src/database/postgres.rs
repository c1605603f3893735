use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{strip_id, Collection, Document, DocumentStore};
use crate::error::{AppError, AppResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        seq BIGSERIAL PRIMARY KEY,
        collection TEXT NOT NULL,
        id UUID NOT NULL,
        body JSONB NOT NULL,
        UNIQUE (collection, id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS documents_name_idx ON documents (collection, (body ->> 'name'))",
    "CREATE INDEX IF NOT EXISTS documents_batch_idx ON documents (collection, (body ->> 'batchNumber'))",
    "CREATE INDEX IF NOT EXISTS documents_sku_idx ON documents (collection, (body ->> 'sku'))",
    "CREATE INDEX IF NOT EXISTS documents_item_ref_idx ON documents (collection, (body ->> 'itemReference'))",
];

/// Document store on a single PostgreSQL JSONB table, one row per document.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;

        // Test the connection
        sqlx::query("SELECT 1").fetch_one(&pool).await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }
}

/// The key is spliced in as a literal so the planner can match the
/// `(body ->> '<key>')` expression indexes. Keys are crate constants.
fn field_lookup_sql(field: &'static str) -> String {
    format!(
        "SELECT body FROM documents WHERE collection = $1 AND body ->> '{}' = $2 ORDER BY seq",
        field
    )
}

fn into_document(body: Json<Value>) -> AppResult<Document> {
    match body.0 {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Store(format!(
            "stored document is not an object: {}",
            other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: Collection, id: Uuid, document: Document) -> AppResult<()> {
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(id)
            .bind(Json(Value::Object(document)))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_all(&self, collection: Collection) -> AppResult<Vec<Document>> {
        sqlx::query_scalar::<_, Json<Value>>(
            "SELECT body FROM documents WHERE collection = $1 ORDER BY seq",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(into_document)
        .collect()
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_scalar::<_, Json<Value>>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(into_document)
        .transpose()
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &'static str,
        value: &str,
    ) -> AppResult<Vec<Document>> {
        let sql = field_lookup_sql(field);
        sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(collection.as_str())
            .bind(value)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(into_document)
            .collect()
    }

    async fn count(&self, collection: Collection) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM documents WHERE collection = $1",
        )
        .bind(collection.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Document) -> AppResult<bool> {
        let patch = strip_id(patch);
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(Value::Object(patch)))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quality_check::ITEM_REFERENCE_FIELD;

    #[test]
    fn item_reference_lookup_uses_indexed_expression() {
        let sql = field_lookup_sql(ITEM_REFERENCE_FIELD);
        let expression = "body ->> 'itemReference'";

        assert!(sql.contains(expression));
        assert!(!sql.contains("$3"));
        assert!(SCHEMA
            .iter()
            .any(|statement| statement.contains(&format!("({})", expression))));
    }
}

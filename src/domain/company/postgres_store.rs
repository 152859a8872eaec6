//! PostgreSQL-based company record store.
//!
//! Table structure:
//! - `company_formats` - one row per company/metro with its address format
//!
//! ```sql
//! CREATE TABLE company_formats (
//!     id      BIGSERIAL PRIMARY KEY,
//!     company TEXT NOT NULL,
//!     metro   TEXT,
//!     state   TEXT,
//!     format  TEXT NOT NULL,
//!     domain  TEXT NOT NULL,
//!     example TEXT,
//!     notes   TEXT,
//!     phone   TEXT
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use super::store::CompanyStore;
use super::types::{CompanyRecord, CompanyStoreError};

type CompanyRow = (
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

pub struct PostgresCompanyStore {
    pool: PgPool,
}

impl PostgresCompanyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape `LIKE` wildcards so the name is matched as a literal substring
pub fn escape_like(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn into_record(row: CompanyRow) -> CompanyRecord {
    let (company, metro, state, address_format, domain, example, notes, phone) = row;
    CompanyRecord {
        company,
        metro: metro.unwrap_or_default(),
        state: state.unwrap_or_default(),
        address_format,
        domain,
        example: example.unwrap_or_default(),
        notes: notes.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
    }
}

#[async_trait]
impl CompanyStore for PostgresCompanyStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), CompanyStoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL connection pool closed");
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<CompanyRecord>, CompanyStoreError> {
        let rows: Vec<CompanyRow> = sqlx::query_as(
            r#"
            SELECT company, metro, state, format, domain, example, notes, phone
            FROM company_formats
            WHERE company ILIKE '%' || $1 || '%' ESCAPE '\'
            ORDER BY id ASC
            "#,
        )
        .bind(escape_like(name))
        .fetch_all(&self.pool)
        .await?;

        tracing::trace!(query = %name, matches = rows.len(), "Queried company_formats");

        Ok(rows.into_iter().map(into_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Acme"), "Acme");
        assert_eq!(escape_like("100%_Pure\\"), "100\\%\\_Pure\\\\");
    }

    #[test]
    fn test_into_record_defaults_nulls() {
        let record = into_record((
            "Acme".to_string(),
            None,
            Some("MA".to_string()),
            "firstname".to_string(),
            "acme.com".to_string(),
            None,
            None,
            None,
        ));
        assert_eq!(record.state, "MA");
        assert!(record.metro.is_empty());
        assert_eq!(record.address_format, "firstname");
    }

    #[tokio::test]
    async fn test_close_shuts_down_pool() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://user@localhost:5432/email_formats")
            .unwrap();
        let store = PostgresCompanyStore::new(pool);

        store.close().await;
        assert!(store.pool.is_closed());
    }
}

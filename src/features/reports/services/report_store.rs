use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewReport, Report};

const CREATE_REPORTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS reports (
        id SERIAL PRIMARY KEY,
        description TEXT NOT NULL,
        incident_type VARCHAR(255) NOT NULL,
        address TEXT,
        latitude NUMERIC NOT NULL,
        longitude NUMERIC NOT NULL,
        image_url VARCHAR(255),
        timestamp TIMESTAMPTZ DEFAULT NOW()
    )
"#;

/// Persistence for reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Round-trip to the database, returning its clock
    async fn ping(&self) -> Result<DateTime<Utc>>;

    /// Create the `reports` table if it is missing. Safe to repeat.
    async fn ensure_schema(&self) -> Result<()>;

    /// Insert one row and return the id the database assigned to it
    async fn insert(&self, report: &NewReport, image_url: Option<&str>) -> Result<Option<i32>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Report>>;
}

/// Postgres-backed store sharing the process-wide pool
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn ping(&self) -> Result<DateTime<Utc>> {
        sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_REPORTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create reports table: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    async fn insert(&self, report: &NewReport, image_url: Option<&str>) -> Result<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO reports (description, incident_type, address, latitude, longitude, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&report.description)
        .bind(&report.incident_type)
        .bind(report.address.as_deref())
        .bind(report.latitude)
        .bind(report.longitude)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Report>> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT id, description, incident_type, address, latitude, longitude, image_url, timestamp
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report {}: {:?}", id, e);
            AppError::Database(e)
        })
    }
}

/// Probe the database, then make sure the table exists.
///
/// Failures are logged and reported through the return value; the process
/// keeps serving either way and inserts fail until the database recovers.
pub async fn bootstrap(store: &dyn ReportStore) -> bool {
    match store.ping().await {
        Ok(now) => tracing::info!("Connected to database, server time: {}", now),
        Err(e) => {
            tracing::error!("Could not connect to database: {}", e);
            return false;
        }
    }

    match store.ensure_schema().await {
        Ok(()) => {
            tracing::info!("Table 'reports' ready");
            true
        }
        Err(e) => {
            tracing::error!("Could not create table 'reports': {}", e);
            false
        }
    }
}

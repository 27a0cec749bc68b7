//! Database module - PostgreSQL connection and migrations

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// How long a query waits for a connection before the write soft-fails
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create database connection pool.
///
/// Connections are opened on first use, so an unreachable database only
/// fails the queries that need it. Errors here mean a malformed URL.
pub fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(database_url)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create tables if not exist
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Assessments (one row per prediction, never updated)
CREATE TABLE IF NOT EXISTS patient_assessments (
    id UUID PRIMARY KEY,
    patient_id VARCHAR(64) NOT NULL DEFAULT 'UNKNOWN',
    age VARCHAR(16) NOT NULL DEFAULT '',
    gender VARCHAR(32) NOT NULL DEFAULT '',
    education VARCHAR(255) NOT NULL DEFAULT '',
    occupation VARCHAR(255) NOT NULL DEFAULT '',
    referring_physician VARCHAR(255) NOT NULL DEFAULT '',
    medical_history TEXT NOT NULL DEFAULT '{}',
    questionnaire_responses TEXT NOT NULL DEFAULT '[]',
    eeg_data TEXT NOT NULL DEFAULT '{}',
    prediction VARCHAR(50) NOT NULL,
    risk_level VARCHAR(20) NOT NULL,
    confidence DOUBLE PRECISION NOT NULL DEFAULT 0,
    assessment_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_assessments_patient ON patient_assessments(patient_id, assessment_date);
CREATE INDEX IF NOT EXISTS idx_assessments_date ON patient_assessments(assessment_date);
"#;

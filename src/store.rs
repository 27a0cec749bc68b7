//! Assessment store - where prediction records go
//!
//! PostgreSQL in deployments; an in-process list for local runs and tests.
//! Without a configured database every write is a soft failure.

use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::db;
use crate::models::{Assessment, AssessmentStats};

/// `DATABASE_URL` value selecting the in-process store
pub const MEMORY_URL: &str = "memory";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("no assessment database configured")]
    Unavailable,
}

#[derive(Debug)]
pub enum AssessmentStore {
    Postgres(PgPool),
    Memory(RwLock<Vec<Assessment>>),
    Disabled,
}

impl AssessmentStore {
    /// Pick a backend from the configured URL, creating the schema for Postgres.
    ///
    /// An unreachable database does not fail startup: the migration failure is
    /// logged and later writes fail softly.
    pub async fn connect(database_url: Option<&str>) -> Result<Self, sqlx::Error> {
        match database_url {
            None => Ok(AssessmentStore::Disabled),
            Some(MEMORY_URL) => Ok(AssessmentStore::memory()),
            Some(url) => {
                let pool = db::create_pool(url)?;
                tracing::info!("Running database migrations...");
                if let Err(e) = db::run_migrations(&pool).await {
                    tracing::error!("Database migrations failed: {}", e);
                }
                Ok(AssessmentStore::Postgres(pool))
            }
        }
    }

    pub fn memory() -> Self {
        AssessmentStore::Memory(RwLock::new(Vec::new()))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            AssessmentStore::Postgres(_) => "postgres",
            AssessmentStore::Memory(_) => "memory",
            AssessmentStore::Disabled => "disabled",
        }
    }

    pub async fn insert(&self, record: &Assessment) -> Result<(), StoreError> {
        match self {
            AssessmentStore::Postgres(pool) => Assessment::create(pool, record).await?,
            AssessmentStore::Memory(records) => records.write().await.push(record.clone()),
            AssessmentStore::Disabled => return Err(StoreError::Unavailable),
        }
        Ok(())
    }

    /// All records, most recent first
    pub async fn list_recent(&self) -> Result<Vec<Assessment>, StoreError> {
        match self {
            AssessmentStore::Postgres(pool) => Ok(Assessment::list_recent(pool).await?),
            AssessmentStore::Memory(records) => {
                Ok(newest_first(records.read().await.iter().cloned().collect()))
            }
            AssessmentStore::Disabled => Err(StoreError::Unavailable),
        }
    }

    /// One patient's records, most recent first
    pub async fn list_by_patient(&self, patient_id: &str) -> Result<Vec<Assessment>, StoreError> {
        match self {
            AssessmentStore::Postgres(pool) => Ok(Assessment::list_by_patient(pool, patient_id).await?),
            AssessmentStore::Memory(records) => Ok(newest_first(
                records
                    .read()
                    .await
                    .iter()
                    .filter(|a| a.patient_id == patient_id)
                    .cloned()
                    .collect(),
            )),
            AssessmentStore::Disabled => Err(StoreError::Unavailable),
        }
    }

    /// Label and risk breakdown, tallied over a full scan
    pub async fn stats(&self) -> Result<AssessmentStats, StoreError> {
        let records = self.list_recent().await?;
        Ok(AssessmentStats::from_records(&records))
    }
}

/// Sort by assessment date descending; later inserts win ties
fn newest_first(mut records: Vec<Assessment>) -> Vec<Assessment> {
    records.reverse();
    records.sort_by(|a, b| b.assessment_date.cmp(&a.assessment_date));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::risk_level;
    use crate::models::{PredictRequest, UserInfo};
    use chrono::Duration;

    /// Nothing listens on port 1
    const UNREACHABLE_URL: &str = "postgres://u:p@127.0.0.1:1/x";

    fn record(patient: &str, prediction: &str, minutes_ago: i64) -> Assessment {
        let req = PredictRequest {
            eeg: None,
            questions: Some(vec![3; 20]),
            medical_history: None,
            user_info: Some(UserInfo {
                patient_id: Some(patient.to_string()),
                ..Default::default()
            }),
        };
        let mut record = Assessment::from_prediction(&req, prediction, risk_level(prediction), 50.0).unwrap();
        record.assessment_date -= Duration::minutes(minutes_ago);
        record
    }

    #[tokio::test]
    async fn test_memory_store_orders_newest_first() {
        let store = AssessmentStore::memory();
        store.insert(&record("P-1", "ADHD", 30)).await.unwrap();
        store.insert(&record("P-2", "Healthy", 10)).await.unwrap();
        store.insert(&record("P-1", "ODD", 20)).await.unwrap();

        let all = store.list_recent().await.unwrap();
        let order: Vec<&str> = all.iter().map(|a| a.prediction.as_str()).collect();
        assert_eq!(order, ["Healthy", "ODD", "ADHD"]);

        let p1 = store.list_by_patient("P-1").await.unwrap();
        assert_eq!(p1.len(), 2);
        assert_eq!(p1[0].prediction, "ODD");

        assert!(store.list_by_patient("P-404").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_breakdowns() {
        let store = AssessmentStore::memory();
        for (prediction, age) in [("ADHD", 1), ("ADHD", 2), ("ASD", 3), ("Non_ADHD", 4)] {
            store.insert(&record("P-1", prediction, age)).await.unwrap();
        }

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_assessments, 4);
        assert_eq!(stats.predictions_breakdown["ADHD"], 2);
        assert_eq!(stats.predictions_breakdown["ASD"], 1);
        assert_eq!(stats.risk_levels_breakdown["high"], 2);
        assert_eq!(stats.risk_levels_breakdown["moderate"], 1);
        assert_eq!(stats.risk_levels_breakdown["low"], 1);
    }

    #[tokio::test]
    async fn test_disabled_store_fails_softly() {
        let store = AssessmentStore::Disabled;
        assert!(matches!(store.insert(&record("P-1", "ADHD", 0)).await, Err(StoreError::Unavailable)));
        assert!(matches!(store.list_recent().await, Err(StoreError::Unavailable)));
        assert!(matches!(store.stats().await, Err(StoreError::Unavailable)));
    }

    #[tokio::test]
    async fn test_connect_selects_backend() {
        assert_eq!(AssessmentStore::connect(None).await.unwrap().backend(), "disabled");
        assert_eq!(AssessmentStore::connect(Some(MEMORY_URL)).await.unwrap().backend(), "memory");
    }

    #[tokio::test]
    async fn test_unreachable_database_connects_and_writes_fail() {
        let store = AssessmentStore::connect(Some(UNREACHABLE_URL)).await.unwrap();
        assert_eq!(store.backend(), "postgres");
        assert!(matches!(
            store.insert(&record("P-1", "ADHD", 0)).await,
            Err(StoreError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_database_url_rejected() {
        assert!(AssessmentStore::connect(Some("not a url")).await.is_err());
    }

    #[test]
    fn test_record_encodes_nested_payloads() {
        let rec = record("P-9", "Dyslexia", 0);
        assert_eq!(rec.patient_id, "P-9");
        assert_eq!(rec.risk_level, "moderate");
        assert_eq!(rec.medical_history, "{}");
        assert_eq!(rec.eeg_data, "{}");
        let answers: Vec<i64> = serde_json::from_str(&rec.questionnaire_responses).unwrap();
        assert_eq!(answers.len(), 20);
    }
}

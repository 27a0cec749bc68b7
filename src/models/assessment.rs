//! Assessment model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationError};

use crate::assessment::{HeuristicFlags, RiskLevel};

/// Stored assessment row. Nested payloads are kept as JSON text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assessment {
    pub id: Uuid,
    pub patient_id: String,
    pub age: String,
    pub gender: String,
    pub education: String,
    pub occupation: String,
    pub referring_physician: String,
    pub medical_history: String,
    pub questionnaire_responses: String,
    pub eeg_data: String,
    pub prediction: String,
    pub risk_level: String,
    pub confidence: f64,
    pub assessment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[validate(length(max = 64))]
    pub patient_id: Option<String>,
    #[validate(length(max = 16))]
    pub age: Option<String>,
    #[validate(length(max = 32))]
    pub gender: Option<String>,
    #[validate(length(max = 255))]
    pub education: Option<String>,
    #[validate(length(max = 255))]
    pub occupation: Option<String>,
    #[validate(length(max = 255))]
    pub referring_physician: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PredictRequest {
    /// Channel name -> value; non-channel keys are stored but not scored
    pub eeg: Option<BTreeMap<String, Value>>,
    #[validate(custom(function = "validate_answers"))]
    pub questions: Option<Vec<i64>>,
    pub medical_history: Option<BTreeMap<String, String>>,
    #[validate(nested)]
    pub user_info: Option<UserInfo>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub confidence_scores: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heuristic_flags: Option<HeuristicFlags>,
    pub saved_to_database: bool,
}

#[derive(Debug, Serialize)]
pub struct AssessmentList {
    pub assessments: Vec<Assessment>,
    pub count: usize,
}

impl From<Vec<Assessment>> for AssessmentList {
    fn from(assessments: Vec<Assessment>) -> Self {
        Self {
            count: assessments.len(),
            assessments,
        }
    }
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct AssessmentStats {
    pub total_assessments: usize,
    pub predictions_breakdown: BTreeMap<String, usize>,
    pub risk_levels_breakdown: BTreeMap<String, usize>,
}

impl AssessmentStats {
    /// Tally labels and risk levels over every stored record
    pub fn from_records(records: &[Assessment]) -> Self {
        let mut stats = Self {
            total_assessments: records.len(),
            ..Default::default()
        };

        for record in records {
            *stats.predictions_breakdown.entry(record.prediction.clone()).or_default() += 1;
            *stats.risk_levels_breakdown.entry(record.risk_level.clone()).or_default() += 1;
        }

        stats
    }
}

fn validate_answers(answers: &[i64]) -> Result<(), ValidationError> {
    if answers.iter().all(|a| (1..=5).contains(a)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("answer_range");
        err.message = Some("questionnaire answers must be between 1 and 5".into());
        Err(err)
    }
}

impl Assessment {
    /// Denormalize a prediction request into a new record
    pub fn from_prediction(
        req: &PredictRequest,
        prediction: &str,
        risk_level: RiskLevel,
        confidence: f64,
    ) -> Result<Self, serde_json::Error> {
        let user = req.user_info.clone().unwrap_or_default();
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            patient_id: user.patient_id.unwrap_or_else(|| "UNKNOWN".to_string()),
            age: user.age.unwrap_or_default(),
            gender: user.gender.unwrap_or_default(),
            education: user.education.unwrap_or_default(),
            occupation: user.occupation.unwrap_or_default(),
            referring_physician: user.referring_physician.unwrap_or_default(),
            medical_history: serde_json::to_string(&req.medical_history.clone().unwrap_or_default())?,
            questionnaire_responses: serde_json::to_string(req.questions.as_deref().unwrap_or_default())?,
            eeg_data: serde_json::to_string(&req.eeg.clone().unwrap_or_default())?,
            prediction: prediction.to_string(),
            risk_level: risk_level.to_string(),
            confidence,
            assessment_date: now,
            created_at: now,
        })
    }

    pub async fn create(pool: &PgPool, record: &Assessment) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO patient_assessments (
                id, patient_id, age, gender, education, occupation, referring_physician,
                medical_history, questionnaire_responses, eeg_data,
                prediction, risk_level, confidence, assessment_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#
        )
        .bind(record.id)
        .bind(&record.patient_id)
        .bind(&record.age)
        .bind(&record.gender)
        .bind(&record.education)
        .bind(&record.occupation)
        .bind(&record.referring_physician)
        .bind(&record.medical_history)
        .bind(&record.questionnaire_responses)
        .bind(&record.eeg_data)
        .bind(&record.prediction)
        .bind(&record.risk_level)
        .bind(record.confidence)
        .bind(record.assessment_date)
        .bind(record.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn list_recent(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Assessment>(
            "SELECT * FROM patient_assessments ORDER BY assessment_date DESC"
        )
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_patient(pool: &PgPool, patient_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Assessment>(
            r#"
            SELECT * FROM patient_assessments
            WHERE patient_id = $1
            ORDER BY assessment_date DESC
            "#
        )
        .bind(patient_id)
        .fetch_all(pool)
        .await
    }
}
